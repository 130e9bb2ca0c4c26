//! Reusable UI components shared by the pages

pub mod filters;
pub mod modal;
pub mod table;

pub use filters::{FilterTabs, SearchBox, TabOption};
pub use modal::{FormActions, FormField, Modal};
pub use table::{ResourceTable, status_class};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_compile() {
        let _ = ResourceTable;
        let _ = FilterTabs;
        let _ = SearchBox;
        let _ = Modal;
        let _ = FormField;
        let _ = FormActions;
    }
}
