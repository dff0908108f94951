//! Detailed documentation for the output types.
//!
//! This module contains comprehensive documentation about the export
//! add-ons supported by todo-export-rs.

/// # Types of Output
///
/// ## `text`
///
/// Plain-text structured dump. Each record starts with `@PROJECT:`,
/// `@LIST:` or `@ACTION:`, continues with an `@ID:` or `@STATUS:` line,
/// then `@DESCRIPTION:` with the description wrapped between `~~` markers,
/// and ends with a blank line. Supports the flat groupings
/// (`actions`, `folders-actions`, `projects-actions`).
///
/// ## `xml`
///
/// Raw XML dump of the filtered model with folder/project keys as
/// attributes. Ignores grouping requests (`format-specific` only); the
/// same schema is accepted as input.
///
/// ## `html`
///
/// Self-contained styled HTML document (inline stylesheet). Supports all
/// grouping orders; `--to-compact` switches from one block per action to
/// one table row per action.
///
/// ## `pdf`
///
/// PDF report with configurable page size (`--to-page`), margins
/// (`--to-margin`), and base font size (`--to-font-size`). Supports all
/// grouping orders and `--to-compact`.
pub mod output_types {
    /// Documentation for the text output format
    pub mod text {
        //! `@KEY: value` record dump with `~~`-delimited descriptions
    }

    /// Documentation for the xml output format
    pub mod xml {
        //! Raw model serialization, also used as the input schema
    }

    /// Documentation for the html output format
    pub mod html {
        //! Styled report with block or compact table layout
    }

    /// Documentation for the pdf output format
    pub mod pdf {
        //! Paged report rendered through the PDF builder
    }
}
