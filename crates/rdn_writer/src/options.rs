//! Writer configuration (`spec.md` §4.4 / §6.5).

/// Which character makes up one indent unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndentCharacter {
    Space,
    Tab,
}

/// Which newline sequence separates indented lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NewLine {
    Lf,
    CrLf,
}

impl NewLine {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            NewLine::Lf => "\n",
            NewLine::CrLf => "\r\n",
        }
    }
}

/// Configuration accepted by [`crate::Writer::new`].
#[derive(Clone, Copy, Debug)]
pub struct WriterOptions {
    /// `false` (default): minimized, no whitespace. `true`: indented.
    pub indented: bool,
    pub indent_character: IndentCharacter,
    /// Indent units per depth level, `0..=127`.
    pub indent_size: u8,
    pub new_line: NewLine,
    /// Nesting deeper than this raises [`rdn_diagnostic::RdnError::InvalidOperation`].
    pub max_depth: usize,
    /// When `true`, `begin_*`/`end_*`/`write_property_name` skip structural
    /// validation entirely (`spec.md` §4.4.6) — the producer is trusted.
    pub skip_validation: bool,
    /// When `true`, a non-empty Map is always written `Map{…}` rather than
    /// the implicit `{…}` form.
    pub always_write_map_type_name: bool,
    /// When `true`, a non-empty Set is always written `Set{…}` rather than
    /// the implicit `{…}` form.
    pub always_write_set_type_name: bool,
    /// A single leaf payload (string, binary, regex, big integer) longer
    /// than this raises [`rdn_diagnostic::RdnError::LimitExceeded`]
    /// (`spec.md` §7.7: "a parameter shared by reader/writer").
    pub max_token_size: u32,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            indented: false,
            indent_character: IndentCharacter::Space,
            indent_size: 2,
            new_line: NewLine::Lf,
            max_depth: crate::DEFAULT_MAX_DEPTH,
            skip_validation: false,
            always_write_map_type_name: false,
            always_write_set_type_name: false,
            max_token_size: rdn_lexer::DEFAULT_MAX_TOKEN_SIZE,
        }
    }
}
