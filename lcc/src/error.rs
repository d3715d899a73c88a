use thiserror::Error;

// Fatal errors. Compilation diagnostics live in `diag`.
#[derive(Debug, Error)]
pub enum Error {
    // IO errors
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to read directory: {0}")]
    DirRead(String, #[source] std::io::Error),

    #[error("No `.l` source in directory: {0}")]
    NoSource(String),

    #[error("No input file")]
    NoInput,

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // Symbol table errors
    #[error("Duplicate symbol: {0}")]
    DuplicateSymbol(String),

    // Code generation errors
    #[error("Undefined symbol: {0}")]
    UndefinedSymbol(String),

    #[error("Array `{0}` cannot be stored in a stack frame")]
    ArrayInFrame(String),

    #[error("Undefined label: {0}")]
    UndefinedLabel(String),

    #[error("Scratch register pool needs at least {1} registers, got {0}")]
    ScratchPool(usize, usize),

    #[error("Register {0} has a fixed role and cannot be a scratch register")]
    ScratchReserved(String),
}
