//! Classified per-class plans.
//!
//! Lowering a record type classifies each of its fields once. The emitter
//! renders plans to source text and the sample runtime executes them, so
//! both agree on what a generated parser does.

use indexmap::IndexMap;
use miette::SourceSpan;
use staxgen_schema::{RecordTypeDecl, Schema};

use crate::{
    emitter::READER,
    error::{CodegenError, Result},
    naming::{capitalize, is_java_keyword, uncapitalize, validate_identifier, validate_type_name},
    shape::{FieldShape, classify},
};

/// One classified field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPlan {
    pub name: String,
    pub shape: FieldShape,
    pub span: Option<SourceSpan>,
}

/// One class to generate: its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPlan {
    pub name: String,
    pub fields: Vec<FieldPlan>,
}

impl ClassPlan {
    /// Classify every field of a record type, rejecting names that would not
    /// compile as Java.
    pub fn lower(decl: &RecordTypeDecl) -> Result<Self> {
        check_type_name(&decl.name, decl.span)?;
        let local = uncapitalize(&decl.name);
        if is_java_keyword(&local) || local == READER {
            return Err(invalid_name(
                &decl.name,
                "type",
                format!("the static parse method would declare a local variable '{local}'"),
                decl.span,
            ));
        }

        let mut accessors = IndexMap::new();
        for field in &decl.fields {
            if let Some(reason) = validate_identifier(&field.name) {
                return Err(invalid_name(&field.name, "field", reason, field.span));
            }
            if let Some(previous) = accessors.insert(capitalize(&field.name), &field.name) {
                let reason = if *previous == field.name {
                    format!("'{previous}' is declared more than once in '{}'", decl.name)
                } else {
                    format!("'{previous}' and '{}' would share an accessor name", field.name)
                };
                return Err(invalid_name(&field.name, "field", reason, field.span));
            }
        }

        let fields = decl
            .fields
            .iter()
            .map(|field| {
                let shape = classify(field).ok_or_else(|| CodegenError::UnsupportedField {
                    type_name: decl.name.clone(),
                    field: field.name.clone(),
                    span: field.span,
                })?;
                if let Some(target) = shape.referenced_type() {
                    check_type_name(target, field.span)?;
                }
                Ok(FieldPlan {
                    name: field.name.clone(),
                    shape,
                    span: field.span,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: decl.name.clone(),
            fields,
        })
    }
}

fn check_type_name(name: &str, span: Option<SourceSpan>) -> Result<()> {
    match validate_type_name(name) {
        Some(reason) => Err(invalid_name(name, "type", reason, span)),
        None => Ok(()),
    }
}

fn invalid_name(
    name: &str,
    kind: &str,
    reason: impl Into<String>,
    span: Option<SourceSpan>,
) -> CodegenError {
    CodegenError::InvalidName {
        name: name.to_string(),
        kind: kind.to_string(),
        reason: reason.into(),
        span,
    }
}

/// Plans for every type in a schema, keyed by name in declaration order.
#[derive(Debug, Clone, Default)]
pub struct PlanSet {
    classes: IndexMap<String, ClassPlan>,
}

impl PlanSet {
    /// Lower a whole schema, rejecting duplicate names and nested-record
    /// cycles. Nothing is emitted unless this succeeds.
    pub fn from_schema(schema: &Schema) -> Result<Self> {
        let mut classes = IndexMap::with_capacity(schema.types.len());
        for decl in &schema.types {
            let plan = ClassPlan::lower(decl)?;
            if classes.contains_key(&plan.name) {
                return Err(CodegenError::DuplicateType {
                    name: plan.name,
                    span: decl.span,
                });
            }
            classes.insert(plan.name.clone(), plan);
        }

        let set = Self { classes };
        set.warn_unknown_references();
        set.check_cycles()?;
        Ok(set)
    }

    pub fn get(&self, name: &str) -> Option<&ClassPlan> {
        self.classes.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassPlan> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn warn_unknown_references(&self) {
        for class in self.iter() {
            for field in &class.fields {
                if let Some(target) = field.shape.referenced_type()
                    && !self.classes.contains_key(target)
                {
                    tracing::warn!(
                        class = %class.name,
                        field = %field.name,
                        "type '{target}' is not declared in the schema"
                    );
                }
            }
        }
    }

    /// Nested records are constructed eagerly, so a cycle through them
    /// never terminates. List items start empty and do not count.
    fn check_cycles(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        fn visit<'a>(
            set: &'a PlanSet,
            index: usize,
            marks: &mut [Mark],
            path: &mut Vec<&'a str>,
        ) -> Result<()> {
            let Some((name, class)) = set.classes.get_index(index) else {
                return Ok(());
            };
            marks[index] = Mark::InProgress;
            path.push(name);

            for field in &class.fields {
                let FieldShape::NestedRecord { type_name } = &field.shape else {
                    continue;
                };
                let Some(next) = set.classes.get_index_of(type_name.as_str()) else {
                    continue;
                };
                match marks[next] {
                    Mark::Done => {}
                    Mark::InProgress => {
                        let start = path
                            .iter()
                            .position(|p| *p == type_name.as_str())
                            .unwrap_or(0);
                        let mut cycle: Vec<&str> = path[start..].to_vec();
                        cycle.push(type_name);
                        return Err(CodegenError::CyclicReference {
                            cycle: cycle.join(" -> "),
                        });
                    }
                    Mark::Unvisited => visit(set, next, marks, path)?,
                }
            }

            path.pop();
            marks[index] = Mark::Done;
            Ok(())
        }

        let mut marks = vec![Mark::Unvisited; self.classes.len()];
        let mut path = Vec::new();
        for index in 0..self.classes.len() {
            if marks[index] == Mark::Unvisited {
                visit(self, index, &mut marks, &mut path)?;
            }
        }
        Ok(())
    }
}
