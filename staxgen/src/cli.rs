use std::path::{Path, PathBuf};

use clap::Parser;
use eyre::{Context, Result};
use staxgen_codegen::{
    AccessMode, DirectorySink, EmitOptions, GenerationMode, Generator, PlanSet, Runtime,
    StreamSink,
};
use staxgen_schema::{SchemaFile, SourceContext};

use crate::config::Config;

/// Extension trait for exiting on schema and codegen errors with pretty
/// diagnostics.
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self, source: &SourceContext) -> T;
}

impl<T> UnwrapOrExit<T> for staxgen_codegen::Result<T> {
    fn unwrap_or_exit(self, source: &SourceContext) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                let report = miette::Report::new(e).with_source_code(source.named_source());
                eprintln!("{report:?}");
                std::process::exit(1);
            }
        }
    }
}

fn open_or_exit(path: &Path) -> SchemaFile {
    match SchemaFile::open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(*e));
            std::process::exit(1);
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "staxgen")]
#[command(version)]
#[command(about = "Generate StAX pull-parser classes from an XML Schema")]
pub(crate) struct Cli {
    /// Path to the XML Schema (.xsd) document
    pub schema: PathBuf,

    /// Output directory (defaults to standard output)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Java package for generated classes
    #[arg(short, long)]
    pub package: Option<String>,

    /// Log every file as it is created
    #[arg(short, long)]
    pub verbose: bool,

    /// How generated classes parse themselves
    #[arg(long, value_enum)]
    pub mode: Option<GenerationMode>,

    /// How generated code reads and writes fields
    #[arg(long, value_enum)]
    pub access: Option<AccessMode>,

    /// Path to a staxgen.toml configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Preview generated code without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Parse a sample document and print the result as JSON
    #[arg(long, requires = "root")]
    pub sample: Option<PathBuf>,

    /// Type of the sample document's root element
    #[arg(long, requires = "sample")]
    pub root: Option<String>,
}

/// Effective settings after merging flags over the config file.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub output: Option<PathBuf>,
    pub options: EmitOptions,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        let config = match &self.config {
            Some(path) => {
                tracing::info!("Using config {}", path.display());
                Config::open(path)?
            }
            None => Config::default(),
        };
        let settings = self.settings(config);
        let file = open_or_exit(&self.schema);

        if let (Some(sample), Some(root)) = (&self.sample, &self.root) {
            return self.run_sample(&file, sample, root);
        }

        let generator = Generator::new(settings.options.clone());
        if self.dry_run {
            self.run_preview(&generator, &file)
        } else {
            self.run_generation(&generator, &file, &settings)
        }
    }

    pub fn settings(&self, config: Config) -> Settings {
        let mut options = EmitOptions::new();
        options.generation = self.mode.or(config.generate.mode).unwrap_or_default();
        options.access = self.access.or(config.generate.access).unwrap_or_default();
        options.package = self.package.clone().or(config.output.package);
        if let Some(indent) = config.generate.indent {
            options.indent = indent;
        }

        Settings {
            output: self.output.clone().or(config.output.dir),
            options,
        }
    }

    fn run_generation(
        &self,
        generator: &Generator,
        file: &SchemaFile,
        settings: &Settings,
    ) -> Result<()> {
        let Some(dir) = &settings.output else {
            let mut sink = StreamSink::stdout();
            generator
                .generate(file.schema(), &mut sink)
                .unwrap_or_exit(file.source());
            return Ok(());
        };

        let mut sink = DirectorySink::new(dir, settings.options.package.clone());
        let result = generator
            .generate(file.schema(), &mut sink)
            .unwrap_or_exit(file.source());

        println!("Generated {} classes in {}", result.classes.len(), dir.display());
        for path in sink.created() {
            let shown = path.strip_prefix(dir).unwrap_or(path);
            println!("  + {}", shown.display());
        }
        Ok(())
    }

    fn run_preview(&self, generator: &Generator, file: &SchemaFile) -> Result<()> {
        let classes = generator
            .preview(file.schema())
            .unwrap_or_exit(file.source());

        for class in &classes {
            println!("── {} ──", class.path.display());
            println!("{}", class.content);
        }

        println!("── Summary ──");
        println!("{} classes would be generated", classes.len());

        Ok(())
    }

    fn run_sample(&self, file: &SchemaFile, sample: &Path, root: &str) -> Result<()> {
        let plans = PlanSet::from_schema(file.schema()).unwrap_or_exit(file.source());
        let xml = std::fs::read_to_string(sample)
            .wrap_err_with(|| format!("Failed to read {}", sample.display()))?;
        let record = Runtime::new(&plans)
            .parse_document(root, &xml)
            .wrap_err_with(|| format!("Failed to parse {}", sample.display()))?;

        println!("{}", serde_json::to_string_pretty(&record)?);
        Ok(())
    }
}
