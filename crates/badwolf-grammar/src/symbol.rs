/// A non-terminal name. Grammars are small and fully known at compile time,
/// so symbols are interned as `&'static str` rather than an owned/allocated
/// identifier type.
pub type Symbol = &'static str;
