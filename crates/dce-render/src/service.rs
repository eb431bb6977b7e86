//! Render service: a configured Handlebars registry behind a small API.
use std::path::{Path, PathBuf};

use dce_core::ParsedContract;
use handlebars::{DirectorySourceOptions, Handlebars, RenderErrorReason};
use serde::Serialize;
use serde_json::json;

use crate::{helpers, RenderError};

/// Top-level template rendered for a whole contract
pub const DATACONTRACT_TEMPLATE: &str = "datacontract.html";
/// Suffix stripped from template file names at registration
pub const TEMPLATE_EXTENSION: &str = ".hbs";

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Re-read template files on every render
    pub dev_mode: bool,
}

pub struct RenderService {
    handlebars: Handlebars<'static>,
    root: Option<PathBuf>,
}

impl RenderService {
    /// Build a service over every `*.hbs` file under `root`.
    ///
    /// Fails when the root is unreadable, a template does not compile, or
    /// `datacontract.html` is missing.
    pub fn new(root: impl AsRef<Path>, options: RenderOptions) -> Result<Self, RenderError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(RenderError::TemplateConfiguration(format!(
                "template root {} is not a directory",
                root.display()
            )));
        }

        let mut source_options = DirectorySourceOptions::default();
        source_options.tpl_extension = TEMPLATE_EXTENSION.to_string();

        let mut handlebars = configured_registry(&options);
        handlebars
            .register_templates_directory(root, source_options)
            .map_err(|e| RenderError::TemplateConfiguration(e.to_string()))?;

        let service = Self {
            handlebars,
            root: Some(root.to_path_buf()),
        };
        service.require(DATACONTRACT_TEMPLATE)?;
        tracing::info!(
            root = %root.display(),
            templates = service.handlebars.get_templates().len(),
            "render service ready"
        );
        Ok(service)
    }

    /// Build a service from in-memory `(name, source)` pairs
    pub fn from_sources<I, N, S>(sources: I) -> Result<Self, RenderError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: AsRef<str>,
        S: AsRef<str>,
    {
        let mut handlebars = configured_registry(&RenderOptions::default());
        for (name, source) in sources {
            handlebars
                .register_template_string(name.as_ref(), source.as_ref())
                .map_err(|e| RenderError::TemplateConfiguration(e.to_string()))?;
        }
        let service = Self { handlebars, root: None };
        service.require(DATACONTRACT_TEMPLATE)?;
        Ok(service)
    }

    /// Render `datacontract.html` with `{datacontract: contract}`
    pub fn render_data_contract(&self, contract: &ParsedContract) -> Result<String, RenderError> {
        self.render(DATACONTRACT_TEMPLATE, &json!({ "datacontract": contract }))
    }

    /// Render any registered template.
    ///
    /// A helper parameter of the wrong type is reported as
    /// [`RenderError::InvalidContract`], since the value came from the
    /// contract. Every other failure is a template problem.
    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String, RenderError> {
        self.handlebars.render(name, context).map_err(|e| {
            let err = match e.reason() {
                RenderErrorReason::TemplateNotFound(missing) => {
                    RenderError::MissingTemplate(missing.clone())
                }
                RenderErrorReason::InvalidParamType(_)
                | RenderErrorReason::ParamTypeMismatchForName(..) => {
                    RenderError::InvalidContract(e.to_string())
                }
                _ => RenderError::TemplateConfiguration(e.to_string()),
            };
            match err {
                RenderError::InvalidContract(_) => {
                    tracing::warn!(template = name, error = %err, "contract value rejected")
                }
                _ => tracing::error!(template = name, error = %err, "template render failed"),
            }
            err
        })
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }

    /// Registered template names, sorted
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .handlebars
            .get_templates()
            .keys()
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn require(&self, name: &str) -> Result<(), RenderError> {
        if self.has_template(name) {
            Ok(())
        } else {
            tracing::error!(template = name, "required template is not registered");
            Err(RenderError::MissingTemplate(name.to_string()))
        }
    }
}

fn configured_registry(options: &RenderOptions) -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(false);
    handlebars.set_dev_mode(options.dev_mode);
    handlebars.register_escape_fn(handlebars::no_escape);
    helpers::register(&mut handlebars);
    handlebars
}
