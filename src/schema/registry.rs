use crate::schema::{SchemaError, SiteSchema};

/// An ordered collection of site schemas
///
/// Detection tries schemas in registration order and the first match wins,
/// so specific patterns should be registered before generic ones.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: Vec<SiteSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from schemas in the given order
    ///
    /// # Errors
    ///
    /// [`SchemaError::Duplicate`] if two schemas share a name.
    pub fn from_schemas<I>(schemas: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = SiteSchema>,
    {
        let mut registry = Self::new();
        for schema in schemas {
            registry.register(schema)?;
        }
        Ok(registry)
    }

    /// Adds a schema; its name must not be registered yet
    pub fn register(&mut self, schema: SiteSchema) -> Result<(), SchemaError> {
        if self.is_registered(schema.name()) {
            return Err(SchemaError::Duplicate(schema.name().to_string()));
        }
        tracing::debug!("Registered schema {}", schema.name());
        self.schemas.push(schema);
        Ok(())
    }

    /// Adds a schema, replacing one with the same name in place
    ///
    /// Returns the replaced schema, if any.
    pub fn register_or_replace(&mut self, schema: SiteSchema) -> Option<SiteSchema> {
        match self.schemas.iter_mut().find(|s| s.name() == schema.name()) {
            Some(slot) => Some(std::mem::replace(slot, schema)),
            None => {
                self.schemas.push(schema);
                None
            }
        }
    }

    /// Removes and returns the schema called `name`
    pub fn unregister(&mut self, name: &str) -> Option<SiteSchema> {
        let index = self.schemas.iter().position(|s| s.name() == name)?;
        Some(self.schemas.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&SiteSchema> {
        self.schemas.iter().find(|s| s.name() == name)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The first registered schema whose URL pattern matches `url`
    pub fn detect(&self, url: &str) -> Option<&SiteSchema> {
        let found = self.schemas.iter().find(|s| s.matches(url));
        if let Some(schema) = found {
            tracing::debug!("Detected schema {} for {}", schema.name(), url);
        }
        found
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.iter().map(SiteSchema::name).collect();
        names.sort_unstable();
        names
    }

    /// Schemas in registration order
    pub fn iter(&self) -> impl Iterator<Item = &SiteSchema> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
