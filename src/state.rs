//! Container-state stack and the reader's position-in-grammar state.

/// The kind of container the tokenizer is currently nested inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Container {
    Object,
    Array,
    Constructor,
}

/// Where the tokenizer is within the grammar. Transitions are driven
/// entirely by the tokens emitted: each structural token moves the state
/// forward the same way a caller's own container-state tracking would.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReaderState {
    Start,
    ObjectStart,
    Object,
    ArrayStart,
    Array,
    ConstructorStart,
    Constructor,
    /// A property name was just emitted; the next token is its value.
    Property,
    /// A scalar or end-marker was just emitted; next is a separator, the
    /// enclosing container's end, or EOF.
    PostValue,
    /// The top-level value has been fully read; only trailing whitespace or
    /// comments (or true EOF) are acceptable from here.
    Finished,
    Closed,
    Error,
    /// Terminal: reached once, `read` returns `false` with no further work.
    Complete,
}
