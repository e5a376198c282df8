use anyhow::Result;

use crate::{
    domain::{Catalog, SubmittedStore},
    form::FormSession,
    storage::KeyValueStore,
};

use super::{options::UiOptions, runtime::App};

/// Interactive terminal front end for a [`FormSession`].
#[derive(Debug)]
pub struct FormUI<S> {
    catalog: Catalog,
    backend: S,
    options: UiOptions,
}

impl<S: KeyValueStore> FormUI<S> {
    pub fn new(catalog: Catalog, backend: S) -> Self {
        Self {
            catalog,
            backend,
            options: UiOptions::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options.title = title.into();
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs until the user quits and returns the records as last persisted.
    pub fn run(self) -> Result<SubmittedStore> {
        let FormUI {
            catalog,
            backend,
            options,
        } = self;

        if let Some(category) = &options.initial_category
            && !catalog.contains(category)
        {
            anyhow::bail!("unknown form type `{category}`");
        }

        let session = FormSession::new(catalog, backend);
        let mut app = App::new(session, options);
        app.run()?;
        Ok(app.into_store())
    }
}
