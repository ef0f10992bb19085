pub mod catalog;
pub mod config;
pub mod element;
pub mod error;
pub mod history;
pub mod logging;
pub mod storage;
pub mod store;
pub mod template;

pub use catalog::{
    component_definitions, create_element, definitions_in_category, find_definition,
    ComponentCategory, ComponentDefinition,
};
pub use config::BuilderConfig;
pub use element::{
    generate_element_id, Animation, CtaButtonProps, Element, ElementProps, ElementStyle,
    ElementType, ElementUpdate, ImagePosition, ProductSectionProps, Spacing, SpecCategory,
    SpecItem, SpecsSectionProps,
};
pub use error::{BuilderError, ErrorCategory};
pub use history::{History, HistoryEntry, DEFAULT_HISTORY_LIMIT};
pub use storage::{FileStorage, MemoryStorage, PageData, PageStorage};
pub use store::{CanvasMode, PageBuilder};
pub use template::{
    apply_template, find_template, product_templates, templates_in_category, ProductTemplate,
    TemplateCategory,
};
