use crate::error::Error;
use arch::Reg;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Compiler settings, loadable from a YAML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lexer: LexerConfig,
    pub codegen: CodegenConfig,
    pub dumps: DumpConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexerConfig {
    /// Prefix marking a variable identifier
    pub sigil: char,
    /// Reject bare words as variables
    pub sigil_required: bool,
    /// Longest accepted identifier, sigil included
    pub max_ident_len: usize,
    /// Starts a comment running to end of line
    pub comment: char,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            sigil: '$',
            sigil_required: false,
            max_ident_len: 100,
            comment: '#',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// Registers operands are popped into, used in rotation
    #[serde(deserialize_with = "registers")]
    pub scratch: Vec<Reg>,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            scratch: Reg::temporaries(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    pub lex: bool,
    pub synt: bool,
    pub asynt: bool,
    pub symb: bool,
}

/// Register names as `Reg::parse` reads them: `$t0`, `t0` or `$8`
fn registers<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Reg>, D::Error> {
    Vec::<String>::deserialize(deserializer)?
        .iter()
        .map(|name| Reg::parse(name).map_err(serde::de::Error::custom))
        .collect()
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::FileOpen(path.display().to_string(), e))?;
        let config: Config = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(config)
    }
}

#[test]
fn test() {
    let yaml = "lexer:\n  sigil_required: true\ncodegen:\n  scratch: [t0, $t1, $16]\n";
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    println!("{:?}", config);
    assert!(config.lexer.sigil_required);
    assert_eq!(config.lexer.max_ident_len, 100);
    assert_eq!(config.codegen.scratch, vec![Reg::T0, Reg::T1, Reg::S0]);
    assert!(!config.dumps.asynt);

    let yaml = "codegen:\n  scratch: [t0, $x9]\n";
    assert!(serde_yaml::from_str::<Config>(yaml).is_err());

    // Written names read back
    let text = serde_yaml::to_string(&Config::default()).unwrap();
    let back: Config = serde_yaml::from_str(&text).unwrap();
    assert_eq!(back, Config::default());
}
