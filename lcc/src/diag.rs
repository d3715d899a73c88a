use crate::grammer::token::Terminal;
use color_print::cprintln;
use std::fmt;
use strum::Display;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum Kind {
    // Syntax errors
    #[error("expected '{0}' before '{1}' token")]
    ExpectedBefore(Terminal, String),

    #[error("expected '{0}' or '{1}' before '{2}' token")]
    ExpectedEitherBefore(Terminal, Terminal, String),

    #[error("expected expression before '{0}' token")]
    ExpectedExpression(String),

    #[error("expected '{0}' before expression")]
    ExpectedBeforeExpression(Terminal),

    #[error("expected '=', ',', ';' or expression before '{0}' token")]
    ExpectedAssignmentOrExpression(String),

    #[error("expected while keyword before '{0}' token")]
    ExpectedWhileKeyword(String),

    #[error("expected correct statement before '{0}' token")]
    ExpectedStatement(String),

    #[error("expected declaration or statement at end of input")]
    UnexpectedEnd,

    #[error("integer constant '{0}' is too large")]
    IntegerOverflow(String),

    // Semantic errors
    #[error("'{0}' undeclared (first use in this function)")]
    UndeclaredVariable(String),

    #[error("implicit declaration of function '{0}'")]
    UndeclaredFunction(String),

    #[error("variable '{0}' already declared")]
    RedeclaredVariable(String),

    #[error("redefinition of '{0}'")]
    FunctionRedefinition(String),

    #[error("variable '{0}' already declared in global scope")]
    VariableAlreadyInGlobalScope(String),

    #[error("wrong assignment to array '{0}'")]
    WrongArrayAssignment(String),

    #[error("wrong assignment to integer '{0}'")]
    WrongIntegerAssignment(String),

    #[error("too many arguments to function '{0}'")]
    TooManyArgs(String),

    #[error("too few arguments to function '{0}'")]
    TooFewArgs(String),

    #[error("undefined reference to 'main'")]
    UndefinedMain,

    #[error("array cannot be declared in local scope")]
    WrongArrayDeclaration,

    #[error("unknown type name '{0}'")]
    UnknownTypeName(String),

    #[error("identifier '{0}' is reserved for generated labels")]
    ReservedIdentifier(String),
}

impl Kind {
    pub fn level(&self) -> Level {
        match self {
            Kind::VariableAlreadyInGlobalScope(_) => Level::Warning,
            _ => Level::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: Kind,
    pub function: Option<String>,
    pub file: String,
    pub line: usize,
    /// First of a run of diagnostics inside one function
    pub is_primary: bool,
}

impl PartialEq for Diagnostic {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.function == other.function
            && self.file == other.file
            && self.line == other.line
    }
}

impl Eq for Diagnostic {}

impl Diagnostic {
    pub fn level(&self) -> Level {
        self.kind.level()
    }

    pub fn is_error(&self) -> bool {
        self.level() == Level::Error
    }

    /// Print with the offending source line, like the assembler does
    pub fn print(&self, source: &str) {
        if let (true, Some(function)) = (self.is_primary, &self.function) {
            cprintln!("<bold>{}</>: In function '<bold>{}</>':", self.file, function);
        }
        match self.level() {
            Level::Error => cprintln!("<red,bold>error</>: {}", self.kind),
            Level::Warning => cprintln!("<yellow,bold>warn</>: {}", self.kind),
        }
        let raw = source.lines().nth(self.line.saturating_sub(1)).unwrap_or("");
        cprintln!("     <blue>--></> <underline>{}:{}</>", self.file, self.line);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", self.line, raw);
        cprintln!("      <blue>|</>");
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (true, Some(function)) = (self.is_primary, &self.function) {
            writeln!(f, "{}: In function '{}':", self.file, function)?;
        }
        write!(f, "{}:{}: {}: {}", self.file, self.line, self.level(), self.kind)
    }
}

/// Ordered, deduplicated diagnostics of one compilation
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    file: String,
    list: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(file: &str) -> Self {
        Self {
            file: file.to_string(),
            list: Vec::new(),
        }
    }

    /// Returns false when an equal diagnostic was already recorded
    pub fn push(&mut self, kind: Kind, function: Option<&str>, line: usize) -> bool {
        let mut diag = Diagnostic {
            kind,
            function: function.map(str::to_string),
            file: self.file.clone(),
            line,
            is_primary: false,
        };
        if self.list.contains(&diag) {
            return false;
        }
        let previous = self.list.last().map(|d| d.function.as_deref());
        diag.is_primary = diag.function.is_some() && previous != Some(function);
        self.list.push(diag);
        true
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.list.iter()
    }

    pub fn kinds(&self) -> Vec<&Kind> {
        self.list.iter().map(|d| &d.kind).collect()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn errors(&self) -> usize {
        self.list.iter().filter(|d| d.is_error()).count()
    }

    pub fn warnings(&self) -> usize {
        self.len() - self.errors()
    }

    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }

    pub fn print(&self, source: &str) {
        for diag in &self.list {
            diag.print(source);
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diag in &self.list {
            writeln!(f, "{}", diag)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

#[test]
fn test() {
    let mut diags = Diagnostics::new("a.l");
    assert!(diags.push(Kind::UndeclaredVariable("y".into()), Some("main"), 3));
    assert!(!diags.push(Kind::UndeclaredVariable("y".into()), Some("main"), 3));
    assert!(diags.push(Kind::UndeclaredVariable("y".into()), Some("main"), 4));
    assert!(diags.push(Kind::VariableAlreadyInGlobalScope("x".into()), Some("f"), 7));
    assert!(diags.push(Kind::UndefinedMain, None, 9));

    let flags: Vec<bool> = diags.iter().map(|d| d.is_primary).collect();
    assert_eq!(flags, vec![true, false, true, false]);
    assert_eq!(diags.errors(), 3);
    assert_eq!(diags.warnings(), 1);
    assert_eq!(
        diags.to_string(),
        "a.l: In function 'main':\n\
         a.l:3: error: 'y' undeclared (first use in this function)\n\
         a.l:4: error: 'y' undeclared (first use in this function)\n\
         a.l: In function 'f':\n\
         a.l:7: warning: variable 'x' already declared in global scope\n\
         a.l:9: error: undefined reference to 'main'\n"
    );
}
