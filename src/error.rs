// thiserror's struct-variant codegen trips unused_assignments
#![allow(unused_assignments)]

use miette::Diagnostic;
use std::io;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Recipe downloading failed. Recipe url {location}. Error: {reason}")]
    #[diagnostic(
        code(cplan::recipe::fetch),
        help("Check that the recipe URL is reachable and that you are allowed to read it")
    )]
    RecipeFetch { location: String, reason: String },

    #[error("Provided environment recipe content type '{content_type}' is unsupported. Supported values are: {}", .supported.join(", "))]
    #[diagnostic(
        code(cplan::recipe::content_type),
        help("Compose recipes must be declared with a YAML content type")
    )]
    UnsupportedContentType {
        content_type: String,
        supported: Vec<String>,
    },

    #[error("Parsing of environment configuration failed. {0}")]
    #[diagnostic(
        code(cplan::recipe::malformed),
        help("The recipe must be a YAML mapping with a 'services' section")
    )]
    MalformedRecipe(String),

    #[error("Recipe has neither inline content nor a location")]
    #[diagnostic(code(cplan::recipe::missing_source))]
    MissingRecipeSource,

    #[error("Service link {0} is invalid")]
    #[diagnostic(
        code(cplan::link::invalid),
        help("Links must be written as 'service' or 'service:alias'")
    )]
    InvalidLinkSyntax(String),

    #[error("Launch order of services [{}] can't be evaluated: {reason}", .services.join(", "))]
    #[diagnostic(
        code(cplan::order::unresolvable),
        help("Review the depends_on and links fields of the listed services")
    )]
    UnresolvableOrder {
        services: Vec<String>,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid recipe: {0}")]
    #[diagnostic(
        code(cplan::recipe::validation),
        help("Run `cplan validate` for detailed validation errors")
    )]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Service '{0}' failed to start: {1}")]
    #[diagnostic(code(cplan::launch::start_failed))]
    ServiceStartFailed(String, String),

    #[error("Network error: {0}")]
    #[diagnostic(code(cplan::launch::network))]
    Network(String),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Multiple errors occurred:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Multiple(Vec<Error>),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether retrying the same operation with the same input can succeed.
    ///
    /// Parsing and ordering failures stem from the recipe itself and are
    /// always permanent. Fetch and launcher failures may be transient; the
    /// caller owns any retry policy.
    pub fn is_permanent(&self) -> bool {
        match self {
            Error::RecipeFetch { .. }
            | Error::Io(_)
            | Error::ServiceStartFailed(..)
            | Error::Network(_) => false,
            Error::Multiple(errors) => errors.iter().all(Error::is_permanent),
            _ => true,
        }
    }

    /// Returns a helpful suggestion for resolving this error, if available.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Error::RecipeFetch { location, .. } => Some(format!(
                "Verify that {} is reachable. Private recipes on the API host need a token (--token or CPLAN_TOKEN).",
                location
            )),
            Error::UnsupportedContentType { supported, .. } => Some(format!(
                "Pass one of the supported content types with --content-type: {}",
                supported.join(", ")
            )),
            Error::InvalidLinkSyntax(link) => Some(format!(
                "Rewrite '{}' as 'service' or 'service:alias' (exactly one colon at most).",
                link
            )),
            Error::UnresolvableOrder { services, .. } => Some(format!(
                "Services cannot depend on each other in a cycle or on services missing from the recipe. Review the depends_on and links fields for: {}",
                services.join(", ")
            )),
            Error::MalformedRecipe(_) | Error::Validation(_) => {
                Some("Validate your recipe with: cplan validate <recipe>".to_string())
            }
            Error::MissingRecipeSource => {
                Some("Provide either inline recipe content or a recipe location.".to_string())
            }
            _ => None,
        }
    }

    /// Formats the error with its suggestion (if any) for user-friendly display.
    pub fn with_suggestion(&self) -> String {
        match self.suggestion() {
            Some(suggestion) => format!("{}\n\nHint: {}", self, suggestion),
            None => self.to_string(),
        }
    }
}
