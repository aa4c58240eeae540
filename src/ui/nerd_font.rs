/// Icons used in provisioning output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NerdFont {
    Check,
    Warning,
    Info,
    Search,
    Download,
    Archive,
    Package,
    Gear,
    Lock,
    Link,
    Upgrade,
    Desktop,
}

impl NerdFont {
    pub const fn unicode(&self) -> char {
        match self {
            Self::Check => '\u{f00c}',    // fa-check
            Self::Warning => '\u{f071}',  // fa-exclamation-triangle
            Self::Info => '\u{f05a}',     // fa-info-circle
            Self::Search => '\u{f002}',   // fa-search
            Self::Download => '\u{f019}', // fa-download
            Self::Archive => '\u{f187}',  // fa-archive
            Self::Package => '\u{f487}',  // oct-package
            Self::Gear => '\u{f013}',     // fa-gear
            Self::Lock => '\u{f023}',     // fa-lock
            Self::Link => '\u{f0c1}',     // fa-link
            Self::Upgrade => '\u{f0aa}',  // fa-arrow-circle-up
            Self::Desktop => '\u{f108}',  // fa-desktop
        }
    }
}

impl std::fmt::Display for NerdFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.unicode())
    }
}

impl From<NerdFont> for char {
    fn from(icon: NerdFont) -> Self {
        icon.unicode()
    }
}
