use super::{name, Field, FieldTy, Many, Model, ModelId, Relation, Schema};
use super::{BelongsTo, HasMany, HasOne, ManyToMany, DEFAULT_ID_ATTRIBUTE};
use crate::{Error, Result};

use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct Builder {
    models: IndexMap<String, Model>,

    /// Identifying attribute for models that do not name one
    default_id_attribute: Option<String>,
}

/// Tracks state while the registered models are linked
struct Linker {
    models: IndexMap<String, Model>,
}

/// A relation accessor waiting to be installed on `model`
struct Accessor {
    model: usize,
    name: String,
    relation: Relation,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model. Model names must be unique.
    pub fn register(&mut self, model: Model) -> Result<&mut Self> {
        if self.models.contains_key(&model.name) {
            return Err(Error::invalid_schema(format!(
                "model `{}` is already registered",
                model.name
            )));
        }
        self.models.insert(model.name.clone(), model);
        Ok(self)
    }

    pub fn register_all(&mut self, models: impl IntoIterator<Item = Model>) -> Result<&mut Self> {
        for model in models {
            self.register(model)?;
        }
        Ok(self)
    }

    pub fn default_id_attribute(&mut self, name: impl Into<String>) -> &mut Self {
        self.default_id_attribute = Some(name.into());
        self
    }

    /// Links the registered models into a schema.
    pub fn build(&self) -> Result<Schema> {
        let id_attribute = self
            .default_id_attribute
            .as_deref()
            .unwrap_or(DEFAULT_ID_ATTRIBUTE);

        let mut linker = Linker {
            models: self.models.clone(),
        };

        for model in linker.models.values_mut() {
            model
                .id_attribute
                .get_or_insert_with(|| id_attribute.to_string());
        }

        linker.verify_fields()?;
        linker.synthesize_through_models(id_attribute)?;

        for (index, model) in linker.models.values_mut().enumerate() {
            model.id = ModelId(index);
            model.relations.clear();
        }

        linker.link_relations()?;

        tracing::debug!(
            models = linker.models.len(),
            synthesized = linker.models.values().filter(|m| m.synthesized).count(),
            "schema built"
        );

        Ok(Schema {
            models: linker.models,
        })
    }
}

impl Linker {
    fn verify_fields(&self) -> Result<()> {
        for model in self.models.values() {
            for field in model.fields.values() {
                let Some(target) = field.target() else {
                    continue;
                };

                if !self.models.contains_key(target) {
                    return Err(Error::invalid_schema(format!(
                        "field `{}.{}` references model `{target}` that was not registered; \
                         did you forget to register it?",
                        model.name, field.name,
                    )));
                }

                if field.name == model.id_attribute() {
                    return Err(Error::invalid_schema(format!(
                        "field `{}.{}` is the identifying attribute and cannot be a relation",
                        model.name, field.name,
                    )));
                }

                if let FieldTy::Many(many) = &field.ty {
                    match &many.through {
                        Some(through) if !self.models.contains_key(through) => {
                            return Err(Error::invalid_schema(format!(
                                "field `{}.{}` names through model `{through}` that was not registered",
                                model.name, field.name,
                            )));
                        }
                        None if many.through_fields.is_some() => {
                            return Err(Error::invalid_schema(format!(
                                "field `{}.{}` sets `through_fields` without a through model",
                                model.name, field.name,
                            )));
                        }
                        _ => {}
                    }
                }
            }
        }

        Ok(())
    }

    /// Creates a through model for every many-to-many field that does not
    /// name one, and points the field at it.
    fn synthesize_through_models(&mut self, id_attribute: &str) -> Result<()> {
        let mut synthesized = vec![];

        for model in self.models.values_mut() {
            for field in model.fields.values_mut() {
                let FieldTy::Many(many) = &mut field.ty else {
                    continue;
                };
                if many.through.is_some() {
                    continue;
                }

                let through_name = name::through_model(&model.name, &field.name);
                let from = name::from_field(&model.name);
                let to = name::to_field(&many.target);

                let mut through = Model::new(&through_name)
                    .with_id_attribute(id_attribute)
                    .field(Field::fk(&from, &model.name))
                    .field(Field::fk(&to, &many.target));
                through.synthesized = true;

                many.through = Some(through_name);
                many.through_fields = Some([from, to]);
                synthesized.push(through);
            }
        }

        for through in synthesized {
            if self.models.contains_key(&through.name) {
                return Err(Error::invalid_schema(format!(
                    "through model `{}` collides with a registered model",
                    through.name
                )));
            }
            self.models.insert(through.name.clone(), through);
        }

        Ok(())
    }

    fn link_relations(&mut self) -> Result<()> {
        // Accessors are collected first and installed afterwards, since the
        // backward side of a relation lands on another model.
        let mut accessors = vec![];

        for curr in 0..self.models.len() {
            let model = &self.models[curr];

            for field in model.fields.values() {
                match &field.ty {
                    FieldTy::Attr(_) => {}
                    FieldTy::Fk(fk) => {
                        let target = self.model_id(&fk.target)?;
                        accessors.push(Accessor {
                            model: curr,
                            name: field.name.clone(),
                            relation: Relation::BelongsTo(BelongsTo {
                                target,
                                field: field.name.clone(),
                                unique: fk.unique,
                            }),
                        });

                        // Links of synthesized through models are reached
                        // only through the many-to-many accessors.
                        if model.synthesized {
                            continue;
                        }

                        let (name, relation) = if fk.unique {
                            let name = fk
                                .related_name
                                .clone()
                                .unwrap_or_else(|| name::related_one(&model.name));
                            let relation = Relation::HasOne(HasOne {
                                source: model.id,
                                field: field.name.clone(),
                            });
                            (name, relation)
                        } else {
                            let name = fk
                                .related_name
                                .clone()
                                .unwrap_or_else(|| name::related_set(&model.name));
                            let relation = Relation::HasMany(HasMany {
                                source: model.id,
                                field: field.name.clone(),
                            });
                            (name, relation)
                        };

                        accessors.push(Accessor {
                            model: target.0,
                            name,
                            relation,
                        });
                    }
                    FieldTy::Many(many) => {
                        let target = self.model_id(&many.target)?;
                        let Some(through_name) = &many.through else {
                            return Err(crate::err!(
                                "field `{}.{}` has no through model after synthesis",
                                model.name,
                                field.name
                            ));
                        };
                        let through = self.model_id(through_name)?;
                        let (own_field, other_field) =
                            self.resolve_through_fields(model, field, many)?;

                        accessors.push(Accessor {
                            model: curr,
                            name: field.name.clone(),
                            relation: Relation::ManyToMany(ManyToMany {
                                target,
                                through,
                                own_field: own_field.clone(),
                                other_field: other_field.clone(),
                                forward: true,
                            }),
                        });

                        accessors.push(Accessor {
                            model: target.0,
                            name: many
                                .related_name
                                .clone()
                                .unwrap_or_else(|| name::related_set(&model.name)),
                            relation: Relation::ManyToMany(ManyToMany {
                                target: model.id,
                                through,
                                own_field: other_field,
                                other_field: own_field,
                                forward: false,
                            }),
                        });
                    }
                }
            }
        }

        for accessor in accessors {
            self.install(accessor)?;
        }

        Ok(())
    }

    fn install(&mut self, accessor: Accessor) -> Result<()> {
        let Accessor {
            model,
            name,
            relation,
        } = accessor;
        let model = &mut self.models[model];

        let clash = model.relations.contains_key(&name)
            || name == model.id_attribute()
            || (!relation.is_forward() && model.fields.contains_key(&name));

        if clash {
            return Err(Error::invalid_schema(format!(
                "relation accessor `{}.{name}` collides with an existing field or relation; \
                 set `related_name` to pick another name",
                model.name
            )));
        }

        model.relations.insert(name, relation);
        Ok(())
    }

    /// Finds which foreign key of the through model points at the declaring
    /// model (`own`) and which at the target (`other`).
    fn resolve_through_fields(
        &self,
        model: &Model,
        field: &Field,
        many: &Many,
    ) -> Result<(String, String)> {
        let Some(through) = many.through.as_ref().and_then(|name| self.models.get(name)) else {
            return Err(crate::err!(
                "field `{}.{}` has no registered through model",
                model.name,
                field.name
            ));
        };

        let fks: Vec<(&str, &str)> = through
            .fields
            .values()
            .filter_map(|f| f.ty.as_fk().map(|fk| (f.name.as_str(), fk.target.as_str())))
            .collect();
        let self_referential = many.target == model.name;

        if let Some([first, second]) = &many.through_fields {
            let target_of = |name: &str| {
                fks.iter()
                    .find(|(fk, _)| *fk == name)
                    .map(|(_, target)| *target)
                    .ok_or_else(|| {
                        Error::invalid_schema(format!(
                            "through field `{}.{name}` named by `{}.{}` is not a foreign key",
                            through.name, model.name, field.name,
                        ))
                    })
            };
            let (first_target, second_target) = (target_of(first)?, target_of(second)?);

            // Order is free unless both keys point at the same model, in which
            // case the first one is the declaring side.
            let resolved = if first == second {
                None
            } else if first_target == model.name && second_target == many.target {
                Some((first.clone(), second.clone()))
            } else if first_target == many.target && second_target == model.name {
                Some((second.clone(), first.clone()))
            } else {
                None
            };

            return resolved.ok_or_else(|| {
                Error::invalid_schema(format!(
                    "through fields `{first}` and `{second}` of `{}` do not link `{}` to `{}` for `{}.{}`",
                    through.name, model.name, many.target, model.name, field.name,
                ))
            });
        }

        let own: Vec<&str> = fks
            .iter()
            .filter(|(_, target)| *target == model.name)
            .map(|(fk, _)| *fk)
            .collect();
        let other: Vec<&str> = fks
            .iter()
            .filter(|(_, target)| *target == many.target)
            .map(|(fk, _)| *fk)
            .collect();

        match (&own[..], &other[..]) {
            ([own], [other]) if !self_referential => Ok((own.to_string(), other.to_string())),
            ([], _) | (_, []) => Err(Error::invalid_schema(format!(
                "through model `{}` has no foreign key to `{}` for `{}.{}`",
                through.name,
                if own.is_empty() { &model.name } else { &many.target },
                model.name,
                field.name,
            ))),
            _ => Err(Error::invalid_schema(format!(
                "through model `{}` has ambiguous foreign keys for `{}.{}`; \
                 set `through_fields` to pick the two links",
                through.name, model.name, field.name,
            ))),
        }
    }

    fn model_id(&self, name: &str) -> Result<ModelId> {
        self.models
            .get_index_of(name)
            .map(ModelId)
            .ok_or_else(|| Error::invalid_schema(format!("model `{name}` was not registered")))
    }
}
