use arbor_dom::Namespace;

use super::tags::{is_html_integration_point, is_mathml_text_integration_point};

/// One entry on the stack of open elements.
///
/// The tag name and namespace are cached next to the handle so scope queries
/// never have to go back to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenElement<H> {
    /// Sink handle of the element.
    pub handle: H,
    /// Local name as created.
    pub name: String,
    /// Namespace as created.
    pub namespace: Namespace,
}

impl<H> OpenElement<H> {
    /// Whether this is an HTML element called `name`.
    #[must_use]
    pub fn is_html(&self, name: &str) -> bool {
        self.namespace == Namespace::Html && self.name == name
    }

    /// Whether this is an HTML element whose name is one of `names`.
    #[must_use]
    pub fn is_html_one_of(&self, names: &[&str]) -> bool {
        self.namespace == Namespace::Html && names.contains(&self.name.as_str())
    }
}

/// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
///
/// The boundary sets for the "has an element in ... scope" queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// "has an element in scope"
    Default,
    /// "has an element in list item scope": adds `ol` and `ul`.
    ListItem,
    /// "has an element in button scope": adds `button`.
    Button,
    /// "has an element in table scope": only `html`, `table` and `template`.
    Table,
    /// "has an element in select scope": everything except `optgroup` and `option`.
    Select,
}

/// "applet, caption, html, table, td, th, marquee, object, template" plus the
/// foreign integration points, which [`Scope::is_boundary`] checks by namespace.
const DEFAULT_SCOPE_BOUNDARY: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
];

impl Scope {
    /// Whether `entry` stops a scope walk of this kind.
    fn is_boundary<H>(self, entry: &OpenElement<H>) -> bool {
        match self {
            Self::Table => entry.is_html_one_of(&["html", "table", "template"]),
            Self::Select => !entry.is_html_one_of(&["optgroup", "option"]),
            Self::Default | Self::ListItem | Self::Button => {
                if entry.namespace != Namespace::Html {
                    return is_mathml_text_integration_point(&entry.name, entry.namespace)
                        || is_html_integration_point(&entry.name, entry.namespace);
                }
                DEFAULT_SCOPE_BOUNDARY.contains(&entry.name.as_str())
                    || (self == Self::ListItem && matches!(entry.name.as_str(), "ol" | "ul"))
                    || (self == Self::Button && entry.name == "button")
            }
        }
    }
}

/// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
///
/// "Initially, the stack of open elements is empty. The stack grows downwards;
/// the topmost node on the stack is the first one added to the stack, and the
/// bottommost node of the stack is the most recently added node in the stack."
///
/// Index 0 is the root `html` element; the last entry is the current node.
#[derive(Debug, Clone)]
pub struct OpenElementStack<H> {
    entries: Vec<OpenElement<H>>,
}

impl<H> Default for OpenElementStack<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H: Copy + Eq> OpenElementStack<H> {
    /// An empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of open elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from the root (index 0) to the current node.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &OpenElement<H>> {
        self.entries.iter()
    }

    /// Entry at `index`, counting from the root.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&OpenElement<H>> {
        self.entries.get(index)
    }

    /// "push onto the stack of open elements"
    pub fn push(&mut self, handle: H, name: &str, namespace: Namespace) {
        debug_assert!(!self.contains(handle), "an element cannot be open twice");
        self.entries.push(OpenElement {
            handle,
            name: name.to_string(),
            namespace,
        });
    }

    /// "pop the current node off the stack of open elements"
    pub fn pop(&mut self) -> Option<OpenElement<H>> {
        self.entries.pop()
    }

    /// Pop entries until one matching `predicate` has been popped.
    ///
    /// Returns the matching entry, or `None` when the stack ran out first.
    pub fn pop_until(
        &mut self,
        mut predicate: impl FnMut(&OpenElement<H>) -> bool,
    ) -> Option<OpenElement<H>> {
        while let Some(entry) = self.entries.pop() {
            if predicate(&entry) {
                return Some(entry);
            }
        }
        None
    }

    /// "pop elements from the stack of open elements until an HTML element
    /// with the same tag name has been popped from the stack"
    pub fn pop_until_named(&mut self, name: &str) -> Option<OpenElement<H>> {
        self.pop_until(|entry| entry.is_html(name))
    }

    /// Pop until an HTML element whose name is in `names` has been popped.
    pub fn pop_until_one_of(&mut self, names: &[&str]) -> Option<OpenElement<H>> {
        self.pop_until(|entry| entry.is_html_one_of(names))
    }

    /// Drop everything above `len` entries.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// "The current node is the bottommost node in this stack of open elements."
    #[must_use]
    pub fn top(&self) -> Option<&OpenElement<H>> {
        self.entries.last()
    }

    /// Handle of the current node.
    #[must_use]
    pub fn current(&self) -> Option<H> {
        self.top().map(|entry| entry.handle)
    }

    /// Whether the current node is an HTML element called `name`.
    #[must_use]
    pub fn current_is(&self, name: &str) -> bool {
        self.top().is_some_and(|entry| entry.is_html(name))
    }

    /// Whether the current node is an HTML element whose name is in `names`.
    #[must_use]
    pub fn current_is_one_of(&self, names: &[&str]) -> bool {
        self.top().is_some_and(|entry| entry.is_html_one_of(names))
    }

    /// Whether `handle` is on the stack.
    #[must_use]
    pub fn contains(&self, handle: H) -> bool {
        self.position(handle).is_some()
    }

    /// Whether an HTML element called `name` is anywhere on the stack.
    #[must_use]
    pub fn contains_named(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.is_html(name))
    }

    /// Index of `handle`, counting from the root.
    #[must_use]
    pub fn position(&self, handle: H) -> Option<usize> {
        self.entries.iter().position(|entry| entry.handle == handle)
    }

    /// Index of the topmost HTML element called `name`.
    #[must_use]
    pub fn last_position_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().rposition(|entry| entry.is_html(name))
    }

    /// Remove `handle` wherever it is. Returns `false` if it was not open.
    pub fn remove(&mut self, handle: H) -> bool {
        match self.position(handle) {
            Some(index) => {
                let _ = self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Put `handle` in place of the entry at `index`, keeping its name.
    pub fn replace(&mut self, index: usize, handle: H) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.handle = handle;
        }
    }

    /// Insert a new entry at `index`, directly above whatever is there now.
    pub fn insert(&mut self, index: usize, handle: H, name: &str, namespace: Namespace) {
        self.entries.insert(
            index,
            OpenElement {
                handle,
                name: name.to_string(),
                namespace,
            },
        );
    }

    /// Walk from the current node towards the root. `true` when `target`
    /// matches before any entry for which `is_boundary` holds.
    fn scope_walk(
        &self,
        mut target: impl FnMut(&OpenElement<H>) -> bool,
        mut is_boundary: impl FnMut(&OpenElement<H>) -> bool,
    ) -> bool {
        for entry in self.entries.iter().rev() {
            if target(entry) {
                return true;
            }
            if is_boundary(entry) {
                return false;
            }
        }
        false
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "The stack of open elements is said to have a particular element in a
    /// specific scope consisting of a list of element types list when the
    /// following algorithm terminates in a match state"
    ///
    /// `boundary` names HTML elements that end the walk.
    #[must_use]
    pub fn in_scope(&self, name: &str, boundary: &[&str]) -> bool {
        self.scope_walk(
            |entry| entry.is_html(name),
            |entry| entry.is_html_one_of(boundary),
        )
    }

    /// "has an element in scope" for an HTML element called `name`.
    #[must_use]
    pub fn has_in_scope(&self, name: &str, scope: Scope) -> bool {
        self.scope_walk(|entry| entry.is_html(name), |entry| scope.is_boundary(entry))
    }

    /// Whether any HTML element named in `names` is in `scope`.
    #[must_use]
    pub fn has_any_in_scope(&self, names: &[&str], scope: Scope) -> bool {
        self.scope_walk(
            |entry| entry.is_html_one_of(names),
            |entry| scope.is_boundary(entry),
        )
    }

    /// Whether this exact element is in `scope`.
    #[must_use]
    pub fn has_handle_in_scope(&self, handle: H, scope: Scope) -> bool {
        self.scope_walk(|entry| entry.handle == handle, |entry| scope.is_boundary(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(names: &[&str]) -> OpenElementStack<usize> {
        let mut stack = OpenElementStack::new();
        for (i, name) in names.iter().enumerate() {
            stack.push(i, name, Namespace::Html);
        }
        stack
    }

    #[test]
    fn scope_stops_at_boundary() {
        let s = stack(&["html", "body", "p", "table", "tr", "td", "span"]);
        assert!(!s.has_in_scope("p", Scope::Default));
        assert!(s.has_in_scope("span", Scope::Default));
        assert!(s.has_in_scope("td", Scope::Table));
        assert!(s.has_in_scope("tr", Scope::Table));
        assert!(!s.has_in_scope("body", Scope::Table));
    }

    #[test]
    fn button_and_list_scopes_extend_default() {
        let s = stack(&["html", "body", "p", "button", "ul", "span"]);
        assert!(s.has_in_scope("p", Scope::Default));
        assert!(!s.has_in_scope("p", Scope::Button));
        assert!(!s.has_in_scope("button", Scope::ListItem));
        assert!(s.has_in_scope("ul", Scope::ListItem));
    }

    #[test]
    fn select_scope_only_passes_options() {
        let s = stack(&["html", "body", "select", "optgroup", "option"]);
        assert!(s.has_in_scope("select", Scope::Select));
        let t = stack(&["html", "body", "select", "div"]);
        assert!(!t.has_in_scope("select", Scope::Select));
    }

    #[test]
    fn foreign_integration_points_are_boundaries() {
        let mut s = stack(&["html", "body", "p"]);
        s.push(10, "svg", Namespace::Svg);
        s.push(11, "foreignObject", Namespace::Svg);
        s.push(12, "div", Namespace::Html);
        assert!(!s.has_in_scope("p", Scope::Default));
        assert!(s.has_in_scope("p", Scope::Table));
    }

    #[test]
    fn explicit_boundary_list() {
        let s = stack(&["html", "body", "ul", "li", "div"]);
        assert!(s.in_scope("li", &["ol", "ul"]));
        assert!(!s.in_scope("body", &["ul"]));
    }

    #[test]
    fn pop_until_returns_the_match() {
        let mut s = stack(&["html", "body", "div", "p", "span"]);
        let popped = s.pop_until_named("div");
        assert_eq!(popped.map(|e| e.handle), Some(2));
        assert_eq!(s.len(), 2);
        assert!(s.current_is("body"));
    }

    #[test]
    fn remove_insert_replace() {
        let mut s = stack(&["html", "body", "b", "p"]);
        assert!(s.remove(2));
        assert!(!s.remove(2));
        s.insert(2, 7, "b", Namespace::Html);
        s.replace(3, 8);
        assert_eq!(s.position(7), Some(2));
        assert_eq!(s.current(), Some(8));
        assert!(s.current_is("p"));
    }
}
