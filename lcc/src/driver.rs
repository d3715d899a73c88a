use crate::compile::{self, Code};
use crate::config::{Config, DumpConfig};
use crate::diag::Diagnostics;
use crate::dump::Dumps;
use crate::error::Error;
use crate::grammer::ast::Program;
use crate::grammer::parsercore::{Analysis, Parser};
use crate::symbols::SymbolTable;
use log::{debug, info};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything one compilation produced
pub struct Compilation {
    pub program: Program,
    pub symbols: SymbolTable,
    pub diagnostics: Diagnostics,
    /// Present only when the analysis found no error
    pub code: Option<Code>,
    pub dumps: Dumps,
}

impl Compilation {
    pub fn succeeded(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    /// AST as YAML
    pub fn asynt(&self) -> Result<String, Error> {
        Ok(serde_yaml::to_string(&self.program)?)
    }
}

pub fn compile(file: &str, source: &str, config: &Config) -> Result<Compilation, Error> {
    info!("analyze {}", file);
    let Analysis {
        program,
        mut symbols,
        diagnostics,
        hook,
    } = Parser::new(file, source, &config.lexer, Dumps::new(&config.dumps)).parse();
    info!(
        "{}: {} error(s), {} warning(s)",
        file,
        diagnostics.errors(),
        diagnostics.warnings()
    );

    let code = if diagnostics.has_errors() {
        None
    } else {
        info!("generate {}", file);
        let code = compile::compile(&program, &mut symbols, &config.codegen)?;
        debug!("{} lines of assembly", code.0.len());
        Some(code)
    };

    Ok(Compilation {
        program,
        symbols,
        diagnostics,
        code,
        dumps: hook,
    })
}

pub fn read_source(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|e| Error::FileRead(path.display().to_string(), e))
}

pub fn compile_file(path: &Path, config: &Config) -> Result<(String, Compilation), Error> {
    let source = read_source(path)?;
    let compilation = compile(&path.display().to_string(), &source, config)?;
    Ok((source, compilation))
}

/// Every `.l` file of a directory, sorted by name
pub fn list_sources(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let entries = fs::read_dir(dir).map_err(|e| Error::DirRead(dir.display().to_string(), e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| Error::DirRead(dir.display().to_string(), e))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "l") {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        return Err(Error::NoSource(dir.display().to_string()));
    }
    paths.sort();
    Ok(paths)
}

/// `foo.l` + `.mips` = `foo.l.mips`
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn write(path: PathBuf, text: &str) -> Result<PathBuf, Error> {
    fs::write(&path, text).map_err(|e| Error::FileCreate(path.display().to_string(), e))?;
    Ok(path)
}

/// Write the assembly and the enabled dumps, returning the files created
pub fn write_outputs(
    source: &Path,
    output: Option<&Path>,
    compilation: &Compilation,
    dumps: &DumpConfig,
) -> Result<Vec<PathBuf>, Error> {
    let mut written = Vec::new();
    if let Some(code) = &compilation.code {
        let path = output.map_or_else(|| with_suffix(source, ".mips"), Path::to_path_buf);
        written.push(write(path, &code.to_string())?);
    }
    if let Some(lex) = &compilation.dumps.lex {
        written.push(write(with_suffix(source, ".lex"), &lex.0)?);
    }
    if let Some(synt) = &compilation.dumps.synt {
        written.push(write(with_suffix(source, ".synt"), &synt.text)?);
    }
    if dumps.asynt {
        written.push(write(with_suffix(source, ".asynt"), &compilation.asynt()?)?);
    }
    if let Some(symb) = &compilation.dumps.symb {
        written.push(write(with_suffix(source, ".symb"), &symb.0)?);
    }
    Ok(written)
}
