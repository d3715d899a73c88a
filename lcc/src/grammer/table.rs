use super::rules::{rules_of, NonTerminal, Rule, Sym, RULES};
use super::token::Terminal;
use log::debug;
use once_cell::sync::Lazy;
use strum::{EnumCount, IntoEnumIterator};

type Set = [bool; Terminal::COUNT];

/// FIRST/FOLLOW membership over (non-terminal x terminal).
/// `Epsilon` in a FIRST row marks a nullable non-terminal.
pub struct Table {
    first: [Set; NonTerminal::COUNT],
    follow: [Set; NonTerminal::COUNT],
}

static TABLE: Lazy<Table> = Lazy::new(Table::build);

pub fn is_first(nt: NonTerminal, t: Terminal) -> bool {
    TABLE.first[nt as usize][t as usize]
}

pub fn is_follow(nt: NonTerminal, t: Terminal) -> bool {
    TABLE.follow[nt as usize][t as usize]
}

pub fn first(nt: NonTerminal) -> Vec<Terminal> {
    members(&TABLE.first[nt as usize])
}

pub fn follow(nt: NonTerminal) -> Vec<Terminal> {
    members(&TABLE.follow[nt as usize])
}

fn members(set: &Set) -> Vec<Terminal> {
    Terminal::iter().filter(|t| set[*t as usize]).collect()
}

fn union(dst: &mut Set, src: &Set, skip_epsilon: bool) -> bool {
    let mut changed = false;
    for t in Terminal::iter() {
        if skip_epsilon && t == Terminal::Epsilon {
            continue;
        }
        if src[t as usize] && !dst[t as usize] {
            dst[t as usize] = true;
            changed = true;
        }
    }
    changed
}

impl Table {
    fn build() -> Self {
        let mut table = Table {
            first: [[false; Terminal::COUNT]; NonTerminal::COUNT],
            follow: [[false; Terminal::COUNT]; NonTerminal::COUNT],
        };

        // 1. FIRST
        let mut changed = true;
        while changed {
            changed = false;
            for rule in RULES.iter() {
                let set = table.first_of(rule.rhs);
                changed |= union(&mut table.first[rule.lhs as usize], &set, false);
            }
        }

        // 2. FOLLOW
        table.follow[NonTerminal::Pg as usize][Terminal::End as usize] = true;
        let mut changed = true;
        while changed {
            changed = false;
            for rule in RULES.iter() {
                for (idx, sym) in rule.rhs.iter().enumerate() {
                    let Sym::N(nt) = sym else { continue };
                    let rest = table.first_of(&rule.rhs[idx + 1..]);
                    changed |= union(&mut table.follow[*nt as usize], &rest, true);
                    if rest[Terminal::Epsilon as usize] {
                        let inherited = table.follow[rule.lhs as usize];
                        changed |= union(&mut table.follow[*nt as usize], &inherited, true);
                    }
                }
            }
        }

        debug!("grammar tables built from {} rules", RULES.len());
        table
    }

    /// FIRST of a symbol sequence, `Epsilon` included when it derives nothing
    fn first_of(&self, syms: &[Sym]) -> Set {
        let mut set = [false; Terminal::COUNT];
        for sym in syms {
            match sym {
                Sym::T(t) => {
                    set[*t as usize] = true;
                    return set;
                }
                Sym::N(nt) => {
                    let first = &self.first[*nt as usize];
                    union(&mut set, first, true);
                    if !first[Terminal::Epsilon as usize] {
                        return set;
                    }
                }
            }
        }
        set[Terminal::Epsilon as usize] = true;
        set
    }

    /// Terminals that select this rule
    fn predict(&self, rule: &Rule) -> Set {
        let mut set = self.first_of(rule.rhs);
        if set[Terminal::Epsilon as usize] {
            set[Terminal::Epsilon as usize] = false;
            union(&mut set, &self.follow[rule.lhs as usize], true);
        }
        set
    }
}

/// Two rules of one non-terminal selected by the same terminal
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub lhs: NonTerminal,
    pub terminal: Terminal,
}

pub fn conflicts() -> Vec<Conflict> {
    let mut result = Vec::new();
    for nt in NonTerminal::iter() {
        let mut seen = [false; Terminal::COUNT];
        for rule in rules_of(nt) {
            let predict = TABLE.predict(rule);
            for t in Terminal::iter().filter(|t| predict[*t as usize]) {
                if seen[t as usize] {
                    result.push(Conflict { lhs: nt, terminal: t });
                }
                seen[t as usize] = true;
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use Terminal::*;

    #[test]
    fn test_sizes() {
        assert_eq!(Terminal::COUNT, 33);
        assert_eq!(NonTerminal::COUNT, 38);
        assert_eq!(RULES.len(), 68);
        for nt in NonTerminal::iter() {
            assert!(rules_of(nt).count() > 0, "{nt} has no rule");
        }
    }

    #[test]
    fn test_ll1() {
        let conflicts = conflicts();
        println!("{:?}", conflicts);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_first() {
        assert_eq!(first(NonTerminal::Vdo), vec![Integer, Epsilon]);
        assert!(is_first(NonTerminal::Compb, LAngle));
        assert!(!is_first(NonTerminal::Compb, LParen));
        assert!(is_first(NonTerminal::F, Read));
        assert!(is_first(NonTerminal::Exp, Excl));
        assert!(is_first(NonTerminal::I, FctId));
        assert!(!is_first(NonTerminal::Pg, End));
        assert!(is_first(NonTerminal::Pg, Epsilon));
    }

    #[test]
    fn test_follow() {
        assert_eq!(follow(NonTerminal::Fdl), vec![End]);
        assert_eq!(follow(NonTerminal::Il), vec![RCurly]);
        assert_eq!(follow(NonTerminal::Vdo), vec![FctId, LCurly, End]);
        assert!(is_follow(NonTerminal::Compb, Then));
        assert!(is_follow(NonTerminal::Compb, Do));
        assert!(is_follow(NonTerminal::Indo, Equal));
        assert!(is_follow(NonTerminal::Vdlb, RParen));
        assert!(!is_follow(NonTerminal::Compb, Equal));
    }
}
