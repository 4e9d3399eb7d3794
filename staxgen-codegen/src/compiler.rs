//! Type compiler and driver.

use staxgen_schema::{RecordTypeDecl, Schema};

use crate::{
    emitter::Emitter,
    error::Result,
    options::{AccessMode, EmitOptions},
    plan::{ClassPlan, FieldPlan, PlanSet},
    shape::{FieldShape, Scalar},
    sink::{ClassSink, GeneratedClass, MemorySink},
};

/// Java type of a field's storage slot.
pub fn java_type(shape: &FieldShape) -> String {
    match shape {
        FieldShape::Scalar(Scalar::String(_)) => "String".to_string(),
        FieldShape::Scalar(Scalar::Boolean(_)) => "boolean".to_string(),
        FieldShape::NestedRecord { type_name } => type_name.clone(),
        FieldShape::ListOfStrings { .. } => "List<String>".to_string(),
        FieldShape::ListOfRecords { item_type, .. } => format!("List<{item_type}>"),
        FieldShape::StringMap => "Map<String, String>".to_string(),
    }
}

/// Compiles one record type at a time through an [`Emitter`].
pub struct TypeCompiler<'e, 's> {
    emit: &'e mut Emitter<'s>,
}

impl<'e, 's> TypeCompiler<'e, 's> {
    pub fn new(emit: &'e mut Emitter<'s>) -> Self {
        Self { emit }
    }

    /// Classify and compile a single declaration.
    pub fn compile(&mut self, decl: &RecordTypeDecl) -> Result<()> {
        let plan = ClassPlan::lower(decl)?;
        self.compile_plan(&plan)
    }

    /// Emit the class for an already classified plan.
    pub fn compile_plan(&mut self, plan: &ClassPlan) -> Result<()> {
        self.emit.start_class(&plan.name)?;
        self.compile_fields(plan);
        self.emit.blank();
        if self.emit.options().access == AccessMode::Accessor {
            self.compile_accessors(plan);
        }
        self.compile_parser(plan);
        self.emit.end_class()?;

        tracing::debug!(class = %plan.name, fields = plan.fields.len(), "compiled class");
        Ok(())
    }

    fn compile_fields(&mut self, plan: &ClassPlan) {
        for field in &plan.fields {
            let name = field.name.as_str();
            match &field.shape {
                FieldShape::Scalar(Scalar::String(default)) => {
                    self.emit.field_string(name, default.as_deref())
                }
                FieldShape::Scalar(Scalar::Boolean(default)) => {
                    self.emit.field_boolean(name, *default)
                }
                FieldShape::NestedRecord { type_name } => self.emit.field_record(type_name, name),
                FieldShape::ListOfStrings { .. } => self.emit.field_list("String", name),
                FieldShape::ListOfRecords { item_type, .. } => {
                    self.emit.field_list(item_type, name)
                }
                FieldShape::StringMap => self.emit.field_map(name),
            }
        }
    }

    fn compile_accessors(&mut self, plan: &ClassPlan) {
        for field in &plan.fields {
            self.emit.accessor_pair(&java_type(&field.shape), &field.name);
        }
    }

    fn compile_parser(&mut self, plan: &ClassPlan) {
        self.emit.parse_routine(&plan.name);
        self.emit.while_next_tag();
        self.emit.switch_on_tag_name();
        for field in &plan.fields {
            self.emit.switch_case(&field.name);
            self.compile_branch(field);
            self.emit.switch_break();
            self.emit.end_block();
        }
        self.emit.switch_default();
        self.emit.end_block(); // switch
        self.emit.end_block(); // while
        self.emit.return_instance();
        self.emit.end_block(); // routine
    }

    fn compile_branch(&mut self, field: &FieldPlan) {
        let name = field.name.as_str();
        match &field.shape {
            FieldShape::Scalar(Scalar::String(_)) => self.emit.set_string(name),
            FieldShape::Scalar(Scalar::Boolean(_)) => self.emit.set_boolean(name),
            FieldShape::NestedRecord { type_name } => self.emit.set_record(name, type_name),
            FieldShape::ListOfStrings { item_tag } => {
                self.emit.while_next_tag();
                self.emit.if_tag_name(item_tag);
                self.emit.add_string(name);
                self.emit.else_expected(item_tag);
                self.emit.end_block();
            }
            FieldShape::ListOfRecords {
                item_tag,
                item_type,
            } => {
                self.emit.while_next_tag();
                self.emit.if_tag_name(item_tag);
                self.emit.add_record(name, item_type);
                self.emit.else_expected(item_tag);
                self.emit.end_block();
            }
            FieldShape::StringMap => {
                self.emit.while_next_tag();
                self.emit.put_string(name);
                self.emit.end_block();
            }
        }
    }
}

/// Summary of a generation run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateResult {
    /// Generated class names, in emission order.
    pub classes: Vec<String>,
}

/// Drives the compiler over a whole schema.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: EmitOptions,
}

impl Generator {
    pub fn new(options: EmitOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    /// Compile every type into `sink`, in schema declaration order.
    ///
    /// All types are classified before anything is written, so an
    /// unsupported field aborts the run without partial output.
    pub fn generate(&self, schema: &Schema, sink: &mut dyn ClassSink) -> Result<GenerateResult> {
        let plans = PlanSet::from_schema(schema)?;
        self.generate_plans(&plans, sink)
    }

    pub fn generate_plans(
        &self,
        plans: &PlanSet,
        sink: &mut dyn ClassSink,
    ) -> Result<GenerateResult> {
        let mut emit = Emitter::new(self.options.clone(), sink);
        let mut result = GenerateResult::default();
        for plan in plans.iter() {
            TypeCompiler::new(&mut emit).compile_plan(plan)?;
            result.classes.push(plan.name.clone());
        }
        tracing::info!("generated {} classes", result.classes.len());
        Ok(result)
    }

    /// Render every class in memory without writing anything.
    pub fn preview(&self, schema: &Schema) -> Result<Vec<GeneratedClass>> {
        let mut sink = MemorySink::new(self.options.package.clone());
        self.generate(schema, &mut sink)?;
        Ok(sink.into_classes())
    }
}
