use crate::{Entity, EntityMetadata, Result};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, RwLock},
};

/// Entity metadata, resolved once per type and shared.
///
/// Built by the application and handed to each [`Repository`](crate::Repository). Types can be
/// registered eagerly at startup with [`Registry::register`] to surface declaration errors
/// early, otherwise they are resolved on first use.
#[derive(Default, Debug)]
pub struct Registry {
    entries: RwLock<HashMap<TypeId, Arc<EntityMetadata>>>,
}

/// A group of registrations applied together, usually one per application module.
pub trait Registration {
    fn configure(&self, registry: &Registry) -> Result<()>;
}

impl<F> Registration for F
where
    F: Fn(&Registry) -> Result<()>,
{
    fn configure(&self, registry: &Registry) -> Result<()> {
        self(registry)
    }
}

impl Registry {
    pub fn new() -> Self {
        Default::default()
    }

    /// Resolve and store the metadata of `E`, replacing any previous entry.
    pub fn register<E: Entity>(&self) -> Result<Arc<EntityMetadata>> {
        let metadata = Arc::new(EntityMetadata::resolve::<E>()?);
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(TypeId::of::<E>(), metadata.clone());
        log::debug!(
            "Registered `{}` as table `{}`",
            metadata.type_name,
            metadata.table_name
        );
        Ok(metadata)
    }

    /// Metadata of `E`, resolved and stored on first request.
    pub fn metadata<E: Entity>(&self) -> Result<Arc<EntityMetadata>> {
        if let Some(metadata) = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&TypeId::of::<E>())
        {
            return Ok(metadata.clone());
        }
        self.register::<E>()
    }

    pub fn contains<E: Entity>(&self) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(&TypeId::of::<E>())
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply a registration group.
    pub fn add(&self, registration: &impl Registration) -> Result<&Self> {
        registration.configure(self)?;
        Ok(self)
    }
}
