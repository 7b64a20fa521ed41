//! The writer's own container stack (`spec.md` §4.4.6).
//!
//! `rdn_writer` is independent of the reader/document crates (`spec.md`
//! §2: "C5 is independent of C2/C3/C4") — this is a second, symmetric
//! implementation of the same grammar, in the push direction.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ContainerKind {
    Object,
    Map,
    Set,
    Array,
    Tuple,
}

impl ContainerKind {
    pub(crate) fn closer(self) -> char {
        match self {
            ContainerKind::Object | ContainerKind::Map | ContainerKind::Set => '}',
            ContainerKind::Array => ']',
            ContainerKind::Tuple => ')',
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            ContainerKind::Object => "Object",
            ContainerKind::Map => "Map",
            ContainerKind::Set => "Set",
            ContainerKind::Array => "Array",
            ContainerKind::Tuple => "Tuple",
        }
    }
}

/// Mirrors `rdn_reader`'s `FrameState`, in the write direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FrameState {
    /// Nothing written yet.
    Start,
    /// (Object) a property name was written; a value is expected next.
    AfterPropertyName,
    /// (Map) a key was written; a value is expected next (emits `=>` first).
    AfterKey,
    /// An element/value was just written; a comma or the closer is next.
    AfterElement,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Frame {
    pub kind: ContainerKind,
    pub state: FrameState,
    /// `true` only for a Set/Map opened without `always_write_*_type_name`
    /// — its opening bracket is not yet on the page because whether it
    /// turns out to be `{`/`Set{}` depends on whether it receives a child
    /// (`spec.md` §4.4.1).
    pub pending_open: bool,
}

impl Frame {
    pub fn new(kind: ContainerKind, pending_open: bool) -> Self {
        Frame {
            kind,
            state: FrameState::Start,
            pending_open,
        }
    }
}
