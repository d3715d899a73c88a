use super::{Labels, Line, Pool};
use crate::error::Error;
use crate::grammer::ast::{Call, Decl, Expr, Instr, Op, Var};
use crate::lines;
use crate::symbols::{Scope, SymbolKind, SymbolTable};
use arch::{Addr, Inst, Reg, WORD};
use itertools::chain;

pub fn compile_function(
    symbols: &mut SymbolTable,
    pool: &mut Pool,
    labels: &mut Labels,
    name: &str,
    params: &[Decl],
    locals: &[Decl],
    body: &Instr,
) -> Result<Vec<Line>, Error> {
    symbols.enter_function_scope();
    symbols.set_scope(Scope::Argument);
    for param in params {
        declare(symbols, param)?;
    }
    symbols.set_scope(Scope::Local);
    for local in locals {
        declare(symbols, local)?;
    }
    let frame = symbols.frame_size();

    let mut compiler = FuncCompiler {
        arity: symbols.arity(),
        symbols,
        pool,
        labels,
    };
    let code = compiler.compile(name, frame, body);
    compiler.symbols.exit_function_scope();
    code
}

/// Frame slots hold scalars only
fn declare(symbols: &mut SymbolTable, decl: &Decl) -> Result<(), Error> {
    match decl {
        Decl::Var(name) => symbols.declare(name, SymbolKind::Scalar, 0).map(|_| ()),
        other => Err(Error::ArrayInFrame(other.name().to_string())),
    }
}

fn push(reg: Reg) -> Vec<Line> {
    lines![
        Inst::SUBU(Reg::SP, Reg::SP, WORD),
        Inst::SW(reg, Addr::Base(0, Reg::SP)),
    ]
}

fn pop(reg: Reg) -> Vec<Line> {
    lines![
        Inst::LW(reg, Addr::Base(0, Reg::SP)),
        Inst::ADDU(Reg::SP, Reg::SP, WORD),
    ]
}

struct FuncCompiler<'a> {
    symbols: &'a mut SymbolTable,
    pool: &'a mut Pool,
    labels: &'a mut Labels,
    arity: usize,
}

impl<'a> FuncCompiler<'a> {
    fn compile(&mut self, name: &str, locals: usize, body: &Instr) -> Result<Vec<Line>, Error> {
        let body_code = self.compile_instr(body)?;
        let fall_through = if body.returns() {
            Vec::new()
        } else {
            chain!(lines![Inst::SW(Reg::ZERO, self.return_slot())], Self::epilogue()).collect()
        };
        Ok(chain!(
            lines![Line::Label(name.to_string())],
            Self::prologue(locals),
            body_code,
            fall_through
        )
        .collect())
    }

    /// Saves the caller frame, then reserves the locals plus one scratch word
    fn prologue(locals: usize) -> Vec<Line> {
        chain!(
            push(Reg::FP),
            lines![Inst::MOVE(Reg::FP, Reg::SP)],
            push(Reg::RA),
            lines![Inst::SUBU(Reg::SP, Reg::SP, WORD * (locals as i32 + 1))]
        )
        .collect()
    }

    fn epilogue() -> Vec<Line> {
        lines![
            Inst::LW(Reg::RA, Addr::Base(-WORD, Reg::FP)),
            Inst::MOVE(Reg::SP, Reg::FP),
            Inst::LW(Reg::FP, Addr::Base(0, Reg::SP)),
            Inst::ADDU(Reg::SP, Reg::SP, WORD),
            Inst::JR(Reg::RA),
        ]
    }

    /// Word reserved by the caller above the arguments
    fn return_slot(&self) -> Addr {
        Addr::Base(WORD * (self.arity as i32 + 1), Reg::FP)
    }
}

// ----------------------------------------------------------------------------
// Instructions
// ----------------------------------------------------------------------------

impl<'a> FuncCompiler<'a> {
    fn compile_instr(&mut self, instr: &Instr) -> Result<Vec<Line>, Error> {
        match instr {
            Instr::Assign(var, value) => {
                let value_code = self.compile_expr(value)?;
                let (addr_code, addr) = self.address(var)?;
                let reg = self.pool.fresh();
                Ok(chain!(value_code, addr_code, pop(reg), lines![Inst::SW(reg, addr)]).collect())
            }

            Instr::Block(body) => {
                let mut code = Vec::new();
                for instr in body {
                    code.extend(self.compile_instr(instr)?);
                }
                Ok(code)
            }

            Instr::If(cond, then, otherwise) => {
                let (else_label, end_label) = self.labels.next_if();
                let cond_code = self.compile_expr(cond)?;
                let reg = self.pool.fresh();
                let then_code = self.compile_instr(then)?;
                match otherwise {
                    Some(otherwise) => {
                        let else_code = self.compile_instr(otherwise)?;
                        Ok(chain!(
                            cond_code,
                            pop(reg),
                            lines![Inst::BEQ(reg, Reg::ZERO, else_label.clone())],
                            then_code,
                            lines![Inst::B(end_label.clone()), Line::Label(else_label)],
                            else_code,
                            lines![Line::Label(end_label)]
                        )
                        .collect())
                    }
                    None => Ok(chain!(
                        cond_code,
                        pop(reg),
                        lines![Inst::BEQ(reg, Reg::ZERO, end_label.clone())],
                        then_code,
                        lines![Line::Label(end_label)]
                    )
                    .collect()),
                }
            }

            Instr::While(cond, body) => {
                let (loop_label, end_label) = self.labels.next_while();
                let cond_code = self.compile_expr(cond)?;
                let reg = self.pool.fresh();
                let body_code = self.compile_instr(body)?;
                Ok(chain!(
                    lines![Line::Label(loop_label.clone())],
                    cond_code,
                    pop(reg),
                    lines![Inst::BEQ(reg, Reg::ZERO, end_label.clone())],
                    body_code,
                    lines![Inst::B(loop_label), Line::Label(end_label)]
                )
                .collect())
            }

            Instr::Call(call) => {
                // Drop the unused return slot
                let call_code = self.compile_call(call)?;
                Ok(chain!(call_code, lines![Inst::ADDU(Reg::SP, Reg::SP, WORD)]).collect())
            }

            Instr::Return(value) => {
                let value_code = self.compile_expr(value)?;
                let reg = self.pool.fresh();
                Ok(chain!(
                    value_code,
                    pop(reg),
                    lines![Inst::SW(reg, self.return_slot())],
                    Self::epilogue()
                )
                .collect())
            }

            Instr::Write(value) => {
                let value_code = self.compile_expr(value)?;
                let reg = self.pool.fresh();
                Ok(chain!(
                    value_code,
                    pop(reg),
                    lines![
                        Inst::MOVE(Reg::A0, reg),
                        Inst::LI(Reg::V0, 1),
                        Inst::SYSCALL(),
                        Inst::LI(Reg::A0, 10),
                        Inst::LI(Reg::V0, 11),
                        Inst::SYSCALL(),
                    ]
                )
                .collect())
            }

            Instr::Empty => Ok(lines![Line::Comment("empty".to_string())]),
        }
    }

    /// Leaves the return slot on top of the stack
    fn compile_call(&mut self, call: &Call) -> Result<Vec<Line>, Error> {
        let mut code = lines![
            Inst::SUBU(Reg::SP, Reg::SP, WORD),
            Inst::SW(Reg::RA, Addr::Base(0, Reg::SP)),
        ];
        for arg in &call.args {
            code.extend(self.compile_expr(arg)?);
        }
        code.push(Inst::JAL(call.function.clone()).into());
        if !call.args.is_empty() {
            code.push(Inst::ADDU(Reg::SP, Reg::SP, WORD * call.args.len() as i32).into());
        }
        Ok(code)
    }

    /// Memory operand of a variable, with the code computing a runtime index
    fn address(&mut self, var: &Var) -> Result<(Vec<Line>, Addr), Error> {
        let name = var.name();
        let symbol = self
            .symbols
            .lookup(name)
            .cloned()
            .ok_or_else(|| Error::UndefinedSymbol(name.to_string()))?;

        match (var, symbol.scope) {
            (Var::Simple(_), Scope::Global) => Ok((Vec::new(), Addr::Label(symbol.name, 0))),
            (Var::Simple(_), Scope::Argument) => {
                let offset = WORD * (self.arity - symbol.address) as i32;
                Ok((Vec::new(), Addr::Base(offset, Reg::FP)))
            }
            (Var::Simple(_), Scope::Local) => {
                let offset = -(2 * WORD + WORD * symbol.address as i32);
                Ok((Vec::new(), Addr::Base(offset, Reg::FP)))
            }
            (Var::Indexed(_, index), Scope::Global) => match index.as_ref() {
                Expr::Int(i) if i.checked_mul(WORD).is_some() => {
                    Ok((Vec::new(), Addr::Label(symbol.name, WORD * i)))
                }
                // Offset past i32 range is scaled at runtime
                index => {
                    let index_code = self.compile_expr(index)?;
                    let reg = self.pool.fresh();
                    let width = self.pool.fresh();
                    let code = chain!(
                        index_code,
                        pop(reg),
                        lines![
                            Inst::LI(width, WORD),
                            Inst::MULT(reg, width),
                            Inst::MFLO(reg),
                        ]
                    )
                    .collect();
                    Ok((code, Addr::Indexed(symbol.name, reg)))
                }
            },
            (Var::Indexed(..), _) => Err(Error::ArrayInFrame(symbol.name)),
        }
    }
}

// ----------------------------------------------------------------------------
// Expressions : each leaves its value pushed
// ----------------------------------------------------------------------------

impl<'a> FuncCompiler<'a> {
    fn compile_expr(&mut self, expr: &Expr) -> Result<Vec<Line>, Error> {
        match expr {
            Expr::Int(value) => {
                let reg = self.pool.fresh();
                Ok(chain!(lines![Inst::LI(reg, *value)], push(reg)).collect())
            }

            Expr::Read => Ok(chain!(lines![Inst::LI(Reg::V0, 5), Inst::SYSCALL()], push(Reg::V0)).collect()),

            Expr::Var(var) => {
                let (addr_code, addr) = self.address(var)?;
                let reg = self.pool.fresh();
                Ok(chain!(addr_code, lines![Inst::LW(reg, addr)], push(reg)).collect())
            }

            Expr::Call(call) => self.compile_call(call),

            Expr::Not(operand) => {
                let operand_code = self.compile_expr(operand)?;
                let reg = self.pool.fresh();
                let result = self.pool.fresh();
                Ok(chain!(
                    operand_code,
                    pop(reg),
                    lines![Inst::SEQ(result, reg, Reg::ZERO)],
                    push(result)
                )
                .collect())
            }

            Expr::BinOp(op @ (Op::Or | Op::And), lhs, rhs) => self.compile_logical(*op, lhs, rhs),
            Expr::BinOp(op, lhs, rhs) if op.is_comparison() => self.compile_comparison(*op, lhs, rhs),
            Expr::BinOp(op, lhs, rhs) => self.compile_arithmetic(*op, lhs, rhs),
        }
    }

    fn compile_arithmetic(&mut self, op: Op, lhs: &Expr, rhs: &Expr) -> Result<Vec<Line>, Error> {
        let lhs_code = self.compile_expr(lhs)?;
        let rhs_code = self.compile_expr(rhs)?;
        let r2 = self.pool.fresh();
        let r1 = self.pool.fresh();
        let r3 = self.pool.fresh();
        let op_code = match op {
            Op::Add => lines![Inst::ADD(r3, r1, r2)],
            Op::Sub => lines![Inst::SUB(r3, r1, r2)],
            Op::Mul => lines![Inst::MULT(r1, r2), Inst::MFLO(r3)],
            _ => lines![Inst::DIV(r1, r2), Inst::MFLO(r3)],
        };
        Ok(chain!(lhs_code, rhs_code, pop(r2), pop(r1), op_code, push(r3)).collect())
    }

    /// 1 when the relation holds, 0 otherwise
    fn compile_comparison(&mut self, op: Op, lhs: &Expr, rhs: &Expr) -> Result<Vec<Line>, Error> {
        let lhs_code = self.compile_expr(lhs)?;
        let rhs_code = self.compile_expr(rhs)?;
        let join = self.labels.next_join();
        let r2 = self.pool.fresh();
        let r1 = self.pool.fresh();
        let r3 = self.pool.fresh();
        let branch = match op {
            Op::Less => Inst::BLT(r1, r2, join.clone()),
            Op::LessEq => Inst::BLE(r1, r2, join.clone()),
            _ => Inst::BEQ(r1, r2, join.clone()),
        };
        Ok(chain!(
            lhs_code,
            rhs_code,
            pop(r2),
            pop(r1),
            lines![Inst::LI(r3, 1), branch, Inst::LI(r3, 0), Line::Label(join)],
            push(r3)
        )
        .collect())
    }

    /// Short circuit: the right operand runs only when the left one does not decide
    fn compile_logical(&mut self, op: Op, lhs: &Expr, rhs: &Expr) -> Result<Vec<Line>, Error> {
        let join = self.labels.next_join();
        let lhs_code = self.compile_expr(lhs)?;
        let r1 = self.pool.fresh();
        let skip = match op {
            Op::Or => Inst::BNE(r1, Reg::ZERO, join.clone()),
            _ => Inst::BEQ(r1, Reg::ZERO, join.clone()),
        };
        let rhs_code = self.compile_expr(rhs)?;
        let r2 = self.pool.fresh();
        Ok(chain!(
            lhs_code,
            pop(r1),
            lines![Inst::SNE(r1, r1, Reg::ZERO)],
            push(r1),
            lines![skip, Inst::ADDU(Reg::SP, Reg::SP, WORD)],
            rhs_code,
            pop(r2),
            lines![Inst::SNE(r2, r2, Reg::ZERO)],
            push(r2),
            lines![Line::Label(join)]
        )
        .collect())
    }
}
