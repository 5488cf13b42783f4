//! [§ 13.2.6.4.7 The adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
//!
//! Repairs misnested formatting markup such as `<b>1<i>2</b>3</i>` by cloning
//! formatting elements around the block that interrupted them.

use arbor_dom::Namespace;

use super::open_elements::Scope;
use super::sink::TreeSink;
use super::tags::is_special;
use super::tree_builder::{InsertionPlace, TreeBuilder};
use crate::tokenizer::Tag;

/// "Let outer loop counter be 0. ... If outer loop counter is greater than or
/// equal to 8, then return."
const OUTER_LOOP_LIMIT: usize = 8;

/// "If inner loop counter is greater than 3 and node is in the list of active
/// formatting elements, then remove node from the list of active formatting
/// elements."
const INNER_LOOP_EVICTION: usize = 3;

impl<S: TreeSink> TreeBuilder<S> {
    /// Run the adoption agency for the end tag `tag`.
    ///
    /// Returns `false` when there is no formatting element with the tag's name
    /// after the last marker; the caller then applies "any other end tag".
    pub(super) fn run_adoption_agency(&mut self, tag: &Tag) -> bool {
        let subject = tag.name.as_str();

        // STEP 2: "If the current node is an HTML element whose tag name is
        // subject, and the current node is not in the list of active formatting
        // elements, then pop the current node off the stack of open elements
        // and return."
        if let Some(current) = self.open_elements.current()
            && self.open_elements.current_is(subject)
            && !self.active_formatting_elements.contains(current)
        {
            let _ = self.open_elements.pop();
            return true;
        }

        // STEP 3-4: outer loop.
        for _ in 0..OUTER_LOOP_LIMIT {
            // STEP 4.3: "Let formatting element be the last element in the list
            // of active formatting elements that: is between the end of the list
            // and the last marker in the list, if any, or the start of the list
            // otherwise, and has the tag name subject. If there is no such
            // element, then return and instead act as described in the "any
            // other end tag" entry above."
            let Some((_, formatting_element)) =
                self.active_formatting_elements.last_element_named(subject)
            else {
                return false;
            };

            // STEP 4.4: "If formatting element is not in the stack of open
            // elements, then this is a parse error; remove the element from the
            // list, and return."
            let Some(formatting_index) = self.open_elements.position(formatting_element) else {
                self.unexpected_end_tag(tag);
                let _ = self.active_formatting_elements.remove(formatting_element);
                return true;
            };

            // STEP 4.5: "If formatting element is in the stack of open elements,
            // but the element is not in scope, then this is a parse error;
            // return."
            if !self
                .open_elements
                .has_handle_in_scope(formatting_element, Scope::Default)
            {
                self.unexpected_end_tag(tag);
                return true;
            }

            // STEP 4.6: "If formatting element is not the current node, this is a
            // parse error. (But do not return.)"
            if self.open_elements.current() != Some(formatting_element) {
                self.unexpected_end_tag(tag);
            }

            // STEP 4.7: "Let furthest block be the topmost node in the stack of
            // open elements that is lower in the stack than formatting element,
            // and is an element in the special category."
            let furthest = self
                .open_elements
                .iter()
                .enumerate()
                .skip(formatting_index + 1)
                .find(|(_, entry)| is_special(&entry.name, entry.namespace))
                .map(|(index, entry)| (index, entry.handle));

            // STEP 4.8: "If there is no furthest block, then the UA must first
            // pop all the nodes from the bottom of the stack of open elements,
            // from the current node up to and including formatting element, then
            // remove formatting element from the list of active formatting
            // elements, and finally return."
            let Some((furthest_index, furthest_block)) = furthest else {
                let _ = self
                    .open_elements
                    .pop_until(|entry| entry.handle == formatting_element);
                let _ = self.active_formatting_elements.remove(formatting_element);
                return true;
            };

            // STEP 4.9: "Let common ancestor be the element immediately above
            // formatting element in the stack of open elements."
            let Some(common_ancestor) = formatting_index
                .checked_sub(1)
                .and_then(|index| self.open_elements.get(index))
                .map(|entry| entry.handle)
            else {
                return true;
            };

            // STEP 4.10: "Let a bookmark note the position of formatting element
            // in the list of active formatting elements relative to the elements
            // on either side of it in the list."
            let mut bookmark = self
                .active_formatting_elements
                .position(formatting_element)
                .unwrap_or_default();

            // STEP 4.11-4.13: inner loop.
            let last_node = self.rebuild_formatting_chain(
                formatting_element,
                furthest_block,
                furthest_index,
                &mut bookmark,
            );

            // STEP 4.14: "Insert whatever last node ended up being in the
            // appropriate place for inserting a node, but using common ancestor
            // as the override target."
            let place = if self.is_foster_target(common_ancestor) {
                self.foster_parent_place()
            } else {
                InsertionPlace {
                    parent: common_ancestor,
                    before: None,
                }
            };
            self.insert_node_at(place, last_node);

            // STEP 4.15: "Create an element for the token for which formatting
            // element was created, in the HTML namespace, with common ancestor as
            // the intended parent."
            let Some(formatting_tag) = self
                .active_formatting_elements
                .position(formatting_element)
                .and_then(|index| self.active_formatting_elements.tag_at(index))
                .cloned()
            else {
                return true;
            };
            let new_element = self.sink.create_element(
                &formatting_tag.name,
                Namespace::Html,
                &formatting_tag.attributes,
            );

            // STEP 4.16: "Take all of the child nodes of furthest block and append
            // them to the element created in the last step."
            self.sink.reparent_children(furthest_block, new_element);
            // STEP 4.17: "Append that new element to furthest block."
            self.sink.append_child(furthest_block, new_element);

            // STEP 4.18: "Remove formatting element from the list of active
            // formatting elements, and insert the new element into the list of
            // active formatting elements at the position of the aforementioned
            // bookmark."
            if let Some(old) = self.active_formatting_elements.position(formatting_element)
                && old < bookmark
            {
                bookmark -= 1;
            }
            let _ = self.active_formatting_elements.remove(formatting_element);
            self.active_formatting_elements
                .insert(bookmark, new_element, formatting_tag.clone());

            // STEP 4.19: "Remove formatting element from the stack of open
            // elements, and insert the new element into the stack of open
            // elements immediately below the position of furthest block in that
            // stack."
            let _ = self.open_elements.remove(formatting_element);
            let below_furthest = self
                .open_elements
                .position(furthest_block)
                .map_or(self.open_elements.len(), |index| index + 1);
            self.open_elements.insert(
                below_furthest,
                new_element,
                &formatting_tag.name,
                Namespace::Html,
            );
        }
        true
    }

    /// STEP 4.11-4.13: walk up from the furthest block to the formatting
    /// element, cloning every formatting element in between and chaining the
    /// clones. Returns the last node of the chain.
    fn rebuild_formatting_chain(
        &mut self,
        formatting_element: S::Handle,
        furthest_block: S::Handle,
        furthest_index: usize,
        bookmark: &mut usize,
    ) -> S::Handle {
        // STEP 4.11: "Let node and last node be furthest block."
        let mut node_index = furthest_index;
        let mut last_node = furthest_block;
        // STEP 4.12: "Let inner loop counter be 0."
        let mut inner_loop_counter = 0;

        loop {
            // STEP 4.13.1
            inner_loop_counter += 1;

            // STEP 4.13.2: "Let node be the element immediately above node in the
            // stack of open elements, or if node is no longer in the stack of
            // open elements (e.g. because it got removed by this algorithm), the
            // element that was immediately above node in the stack of open
            // elements before node was removed."
            let Some(above) = node_index.checked_sub(1) else {
                break;
            };
            node_index = above;
            let Some(node) = self.open_elements.get(node_index).map(|entry| entry.handle) else {
                break;
            };

            // STEP 4.13.3: "If node is formatting element, then break."
            if node == formatting_element {
                break;
            }

            let mut list_index = self.active_formatting_elements.position(node);

            // STEP 4.13.4
            if inner_loop_counter > INNER_LOOP_EVICTION
                && let Some(index) = list_index.take()
            {
                let _ = self.active_formatting_elements.remove(node);
                if index < *bookmark {
                    *bookmark -= 1;
                }
            }

            // STEP 4.13.5: "If node is not in the list of active formatting
            // elements, then remove node from the stack of open elements and
            // continue."
            let Some(list_index) = list_index else {
                let _ = self.open_elements.remove(node);
                continue;
            };

            // STEP 4.13.6: "Create an element for the token for which the element
            // node was created, in the HTML namespace, with common ancestor as
            // the intended parent; replace the entry for node in the list of
            // active formatting elements with an entry for the new element,
            // replace the entry for node in the stack of open elements with an
            // entry for the new element, and let node be the new element."
            let Some(node_tag) = self.active_formatting_elements.tag_at(list_index).cloned()
            else {
                continue;
            };
            let clone =
                self.sink
                    .create_element(&node_tag.name, Namespace::Html, &node_tag.attributes);
            self.active_formatting_elements.replace(list_index, clone);
            self.open_elements.replace(node_index, clone);

            // STEP 4.13.7: "If last node is furthest block, then move the
            // aforementioned bookmark to be immediately after the new node in the
            // list of active formatting elements."
            if last_node == furthest_block {
                *bookmark = list_index + 1;
            }

            // STEP 4.13.8: "Append last node to node."
            self.sink.append_child(clone, last_node);
            // STEP 4.13.9: "Set last node to node."
            last_node = clone;
        }

        last_node
    }
}
