//! Manifest loading
//!
//! Entries are created section by section in dependency order. Each entry is
//! looked up by its key field first, so loading the same manifest twice
//! reuses what the first run created.

use std::{collections::BTreeMap, path::Path};

use anyhow::{Context, anyhow};
use serde_json::Value;
use towerkit_api::{CreateArgs, FactoryOptions, Page, PageKind, TowerApi};
use tracing::{info, warn};

use crate::manifest::{Manifest, Resource, key_field, load_order, references};

/// Load the manifest at `path`, optionally removing everything afterwards
pub async fn run(api: &TowerApi, path: &Path, teardown: bool) -> anyhow::Result<Vec<Page>> {
    let manifest = Manifest::from_path(path)?;
    info!("Loading {} resources from {}", manifest.len(), path.display());

    let result = Loader::new(api).load(&manifest).await;
    if teardown {
        let removed = api.teardown().len();
        api.teardown().run().await.context("Teardown failed")?;
        info!("Removed {} resources", removed);
    }
    result
}

/// Creates manifest entries, remembering them by kind and name
pub struct Loader<'a> {
    api: &'a TowerApi,
    loaded: BTreeMap<(PageKind, String), Page>,
}

impl<'a> Loader<'a> {
    pub fn new(api: &'a TowerApi) -> Self {
        Self {
            api,
            loaded: BTreeMap::new(),
        }
    }

    /// Already loaded entry of `kind` named `name`
    pub fn get(&self, kind: PageKind, name: &str) -> Option<&Page> {
        self.loaded.get(&(kind, name.to_string()))
    }

    /// Load every entry; returns the pages in load order
    pub async fn load(&mut self, manifest: &Manifest) -> anyhow::Result<Vec<Page>> {
        let mut pages = Vec::with_capacity(manifest.len());
        for kind in load_order()? {
            for resource in manifest.section(kind) {
                pages.push(self.load_one(kind, resource).await?);
            }
        }
        Ok(pages)
    }

    async fn load_one(&mut self, kind: PageKind, resource: &Resource) -> anyhow::Result<Page> {
        let key = key_field(kind);
        let name = resource
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("{} entry without a '{}': {:?}", kind, key, resource))?
            .to_string();
        if self.get(kind, &name).is_some() {
            warn!("Duplicate {} '{}' in manifest, loading it again", kind, name);
        }

        let mut fields = resource.clone();
        let mut args = CreateArgs::new();
        for (dep, reference) in references(kind, resource) {
            let page = self
                .get(dep, &reference)
                .cloned()
                .ok_or_else(|| anyhow!("{} '{}' refers to unknown {} '{}'", kind, name, dep, reference))?;
            fields.remove(dep.name());
            args = args.using(page);
        }

        let factory = self
            .api
            .factory(kind)
            .with_options(FactoryOptions::get_or_create(&[key]));
        let page = factory
            .create(args.fields(fields))
            .await
            .with_context(|| format!("Failed to load {} '{}'", kind, name))?;
        info!("Loaded {} '{}' at {}", kind, name, page.endpoint());

        self.loaded.insert((kind, name), page.clone());
        Ok(page)
    }
}
