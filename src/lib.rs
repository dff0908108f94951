pub mod addon;
pub mod cli;
pub mod docs;
pub mod loader;
pub mod model;
pub mod order;
pub mod style;

pub fn get_addon_types() -> Vec<String> {
    vec![
        "text".to_string(),
        "xml".to_string(),
        "html".to_string(),
        "pdf".to_string(),
    ]
}

pub fn get_export_orders() -> Vec<String> {
    vec![
        "format-specific".to_string(),
        "actions".to_string(),
        "folders-actions".to_string(),
        "folders-projects-actions".to_string(),
        "projects-actions".to_string(),
        "projects-folders-actions".to_string(),
    ]
}
