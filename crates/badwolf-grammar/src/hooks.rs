use crate::element::ConsumedElement;
use crate::Symbol;

/// Called at clause start (`ProcessStart`) or clause end (`ProcessEnd`).
pub type ClauseHook<B, E> = fn(&mut B, Symbol) -> Result<(), E>;

/// Called after each element of a clause is consumed (`ProcessedElement`).
pub type ElementHook<K, B, E> = fn(&mut B, &ConsumedElement<K>) -> Result<(), E>;

/// The semantic hooks attached to one clause. Hooks are stateless function
/// values, never methods on the builder they mutate — the grammar table
/// owns them, the builder owns only data (§9).
#[derive(Clone, Copy)]
pub struct Hooks<K, B, E> {
    pub on_start: Option<ClauseHook<B, E>>,
    pub on_element: Option<ElementHook<K, B, E>>,
    pub on_end: Option<ClauseHook<B, E>>,
}

impl<K, B, E> Default for Hooks<K, B, E> {
    fn default() -> Self {
        Self {
            on_start: None,
            on_element: None,
            on_end: None,
        }
    }
}

impl<K, B, E> std::fmt::Debug for Hooks<K, B, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("on_start", &self.on_start.is_some())
            .field("on_element", &self.on_element.is_some())
            .field("on_end", &self.on_end.is_some())
            .finish()
    }
}
