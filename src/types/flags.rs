use std::fmt;

/// The option flags of one answer specification.
///
/// Flags are toggled by the letters of the `/OPTIONS/` block: an uppercase
/// letter enables a flag, the lowercase letter disables it. Infinite-space
/// and trim-spaces are enabled by default, everything else is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Flags {
    /// `I` / `i`: match case-insensitively.
    pub ignore_case: bool,
    /// `D` / `d`: `.` also matches line terminators.
    pub dot_all: bool,
    /// `S` / `s`: a literal space matches any run of spaces and tabs.
    pub infinite_space: bool,
    /// `T` / `t`: trim blank lines and per-line horizontal whitespace.
    pub trim_spaces: bool,
    /// `P` / `p`: `;` and `\|` tolerate surrounding whitespace, `;` also matches a newline.
    pub pipe_space: bool,
    /// `R` / `r`: `<`, `<<`, `>`, `>>` tolerate surrounding whitespace.
    pub redirect_space: bool,
    /// `O` / `o`: score fragments against answer lines in any order.
    pub match_any_order: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            ignore_case: false,
            dot_all: false,
            infinite_space: true,
            trim_spaces: true,
            pipe_space: false,
            redirect_space: false,
            match_any_order: false,
        }
    }
}

impl Flags {
    /// Letters accepted in the options block of the current syntax.
    pub const OPTION_LETTERS: &'static str = "IiDdPpRrOoSsTt";

    /// Letters accepted in the suffix of the legacy syntax.
    pub const LEGACY_OPTION_LETTERS: &'static str = "IDPROST";

    /// Apply one option letter of the current syntax.
    ///
    /// Returns `false` if the letter is not recognized; the flags are then
    /// left untouched.
    pub fn apply_option(&mut self, letter: char) -> bool {
        let enable = letter.is_ascii_uppercase();
        let slot = match letter.to_ascii_uppercase() {
            'I' => &mut self.ignore_case,
            'D' => &mut self.dot_all,
            'S' => &mut self.infinite_space,
            'T' => &mut self.trim_spaces,
            'P' => &mut self.pipe_space,
            'R' => &mut self.redirect_space,
            'O' => &mut self.match_any_order,
            _ => return false,
        };
        *slot = enable;
        true
    }

    /// Apply one option letter of the legacy suffix syntax.
    ///
    /// Legacy letters are uppercase only. `S` and `T` turn their (default
    /// on) flag off, every other letter turns its flag on.
    pub fn apply_legacy_option(&mut self, letter: char) -> bool {
        match letter {
            'I' => self.ignore_case = true,
            'D' => self.dot_all = true,
            'P' => self.pipe_space = true,
            'R' => self.redirect_space = true,
            'O' => self.match_any_order = true,
            'S' => self.infinite_space = false,
            'T' => self.trim_spaces = false,
            _ => return false,
        }
        true
    }

    /// Build flags from an options string, ignoring unrecognized letters.
    #[must_use]
    pub fn from_options(options: &str) -> Self {
        let mut flags = Self::default();
        for letter in options.chars() {
            flags.apply_option(letter);
        }
        flags
    }
}

impl fmt::Display for Flags {
    /// Renders every letter, e.g. `/IdprOST/`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters = [
            (self.ignore_case, 'I'),
            (self.dot_all, 'D'),
            (self.pipe_space, 'P'),
            (self.redirect_space, 'R'),
            (self.match_any_order, 'O'),
            (self.infinite_space, 'S'),
            (self.trim_spaces, 'T'),
        ];
        f.write_str("/")?;
        for (on, letter) in letters {
            let shown = if on { letter } else { letter.to_ascii_lowercase() };
            write!(f, "{shown}")?;
        }
        f.write_str("/")
    }
}
