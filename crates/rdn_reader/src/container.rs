//! The reader's container stack (`spec.md` §4.2.1).
//!
//! Each frame records which container kind is open and exactly how far
//! through that container's grammar the reader has progressed. The
//! `Undetermined` kind exists only transiently, during the bounded
//! lookahead of §4.2.2 — by the time a frame is actually pushed onto the
//! stack, resolution has already happened and the frame carries a
//! concrete kind.

/// The concrete kind of an open container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    Object,
    Map,
    Set,
    Array,
    Tuple,
}

impl ContainerKind {
    /// The closing delimiter byte this container expects.
    pub fn closer(self) -> u8 {
        match self {
            ContainerKind::Object | ContainerKind::Map | ContainerKind::Set => b'}',
            ContainerKind::Array => b']',
            ContainerKind::Tuple => b')',
        }
    }
}

/// Where we are within one frame's grammar. Names read left-to-right
/// through a production, e.g. `AfterKey` = "the key has been read, `=>`
/// is expected next".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FrameState {
    /// Just opened; nothing has been read yet. A closer here means "empty".
    Start,
    /// (Object) a property name was read; `:` is expected next.
    AfterPropertyName,
    /// (Object) `:` was read; a value is expected next.
    AfterColon,
    /// (Map) a key was read; `=>` is expected next.
    AfterKey,
    /// (Map) `=>` was read; a value is expected next.
    AfterArrow,
    /// An element (Array/Tuple/Set element, or Object/Map value) was just
    /// read; `,` or the closer is expected next.
    AfterElement,
    /// `,` was read; another element/key/property-name is expected next,
    /// unless `allow_trailing_commas` is set and the closer follows.
    AfterComma,
}

/// One entry in the reader's container stack.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Frame {
    pub kind: ContainerKind,
    pub state: FrameState,
}

impl Frame {
    pub fn new(kind: ContainerKind) -> Self {
        Frame {
            kind,
            state: FrameState::Start,
        }
    }
}
