use super::Orm;
use crate::Result;

use ormlet_core::schema::{self, Model};

use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    core: schema::Builder,
}

impl Builder {
    pub fn register(&mut self, model: Model) -> Result<&mut Self> {
        self.core.register(model)?;
        Ok(self)
    }

    pub fn register_all(&mut self, models: impl IntoIterator<Item = Model>) -> Result<&mut Self> {
        self.core.register_all(models)?;
        Ok(self)
    }

    /// Sets the identifying attribute of models that do not name their own.
    pub fn default_id_attribute(&mut self, name: impl Into<String>) -> &mut Self {
        self.core.default_id_attribute(name);
        self
    }

    pub fn build(&self) -> Result<Orm> {
        let schema = self.core.build()?;
        Ok(Orm {
            schema: Arc::new(schema),
        })
    }
}
