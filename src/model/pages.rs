//! Page partition over the document model.
//!
//! Pages are derived, not stored: a fixed-size contiguous slicing of the
//! root's children used as the unit of lazy materialization.

use super::DocumentNode;

/// Top-level nodes per page.
pub const DEFAULT_NODES_PER_PAGE: usize = 5;

/// A view of the root's children as fixed-size pages.
#[derive(Debug, Clone, Copy)]
pub struct Pages<'a> {
    children: &'a [DocumentNode],
    nodes_per_page: usize,
}

impl<'a> Pages<'a> {
    /// Partition `root`'s children into pages of `nodes_per_page` nodes.
    ///
    /// A zero page size is treated as one node per page.
    pub fn new(root: &'a DocumentNode, nodes_per_page: usize) -> Self {
        Self {
            children: root.children(),
            nodes_per_page: nodes_per_page.max(1),
        }
    }

    pub const fn nodes_per_page(&self) -> usize {
        self.nodes_per_page
    }

    pub const fn node_count(&self) -> usize {
        self.children.len()
    }

    pub const fn page_count(&self) -> usize {
        self.children.len().div_ceil(self.nodes_per_page)
    }

    /// The node slice for one page; empty when out of range.
    ///
    /// Pages are a strict partition: contiguous, non-overlapping, the last
    /// page possibly shorter.
    pub fn slice(&self, page: usize) -> &'a [DocumentNode] {
        let start = page.saturating_mul(self.nodes_per_page);
        if start >= self.children.len() {
            return &[];
        }
        let end = (start + self.nodes_per_page).min(self.children.len());
        &self.children[start..end]
    }

    /// Iterate all page slices in order.
    pub fn iter(&self) -> impl Iterator<Item = &'a [DocumentNode]> + '_ {
        (0..self.page_count()).map(|page| self.slice(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentNode;

    fn root_with(n: usize) -> DocumentNode {
        DocumentNode::root(
            (0..n)
                .map(|i| DocumentNode::paragraph(vec![DocumentNode::text(format!("p{i}"))]))
                .collect(),
        )
    }

    #[test]
    fn test_twelve_children_five_per_page() {
        let root = root_with(12);
        let pages = Pages::new(&root, 5);
        assert_eq!(pages.page_count(), 3);
        assert_eq!(pages.slice(0).len(), 5);
        assert_eq!(pages.slice(1).len(), 5);
        assert_eq!(pages.slice(2).len(), 2);
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let root = root_with(3);
        let pages = Pages::new(&root, 5);
        assert_eq!(pages.page_count(), 1);
        assert!(pages.slice(1).is_empty());
        assert!(pages.slice(usize::MAX).is_empty());
    }

    #[test]
    fn test_empty_root_has_zero_pages() {
        let root = root_with(0);
        let pages = Pages::new(&root, 5);
        assert_eq!(pages.page_count(), 0);
    }

    #[test]
    fn test_zero_page_size_clamps_to_one() {
        let root = root_with(4);
        let pages = Pages::new(&root, 0);
        assert_eq!(pages.nodes_per_page(), 1);
        assert_eq!(pages.page_count(), 4);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn pages_partition_children_exactly(
                node_count in 0..200usize,
                nodes_per_page in 1..20usize,
            ) {
                let root = root_with(node_count);
                let pages = Pages::new(&root, nodes_per_page);

                let rejoined: Vec<_> = pages.iter().flatten().cloned().collect();
                prop_assert_eq!(rejoined.as_slice(), root.children());

                for page in 0..pages.page_count() {
                    let len = pages.slice(page).len();
                    prop_assert!(len > 0, "no page may be empty");
                    prop_assert!(len <= nodes_per_page);
                }
            }

            #[test]
            fn page_count_is_ceiling_division(
                node_count in 0..500usize,
                nodes_per_page in 1..50usize,
            ) {
                let root = root_with(node_count);
                let pages = Pages::new(&root, nodes_per_page);
                prop_assert_eq!(
                    pages.page_count(),
                    node_count.div_ceil(nodes_per_page)
                );
            }
        }
    }
}
