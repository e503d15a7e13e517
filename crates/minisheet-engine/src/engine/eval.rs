//! Formula evaluation.
//!
//! Formulas are a flat chain of operands joined by `+ - * /`, applied strictly
//! left to right with no precedence: `=2+3*4` is `(2+3)*4 = 20`. Operands are
//! numbers, cell references, or parenthesized sub-expressions.
//!
//! All per-evaluation state lives in an [`EvalContext`] that borrows the grid
//! immutably. The context memoizes cell values for the rest of the pass and
//! tracks the cells currently on the call chain to detect cycles. A context is
//! a single pass: create a fresh one after the grid changes.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::cell_ref::CellRef;
use super::cell::Grid;
use super::format::CellValue;

/// Ways a formula can fail. Everything else (bad tokens, bad references,
/// division by zero) evaluates to a number.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    #[error("circular reference through {0}")]
    Cycle(CellRef),

    #[error("formula nested deeper than {0} levels")]
    TooDeep(usize),
}

impl EvalError {
    /// Marker shown in place of a value.
    pub fn marker(&self) -> &'static str {
        match self {
            EvalError::Cycle(_) => "#CYCLE!",
            EvalError::TooDeep(_) => "#DEPTH!",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    fn from_byte(b: u8) -> Option<Op> {
        match b {
            b'+' => Some(Op::Add),
            b'-' => Some(Op::Sub),
            b'*' => Some(Op::Mul),
            b'/' => Some(Op::Div),
            _ => None,
        }
    }

    fn apply(self, acc: f64, operand: f64) -> f64 {
        match self {
            Op::Add => acc + operand,
            Op::Sub => acc - operand,
            Op::Mul => acc * operand,
            Op::Div => acc / operand,
        }
    }
}

/// Byte cursor over a whitespace-free formula body.
struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    /// Consume a run of ASCII bytes matching `pred`.
    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    /// Consume the longest numeric literal: digits with at most one `.`, then
    /// an optional exponent. A `.` that starts no number is consumed alone and
    /// yields an empty token.
    fn number(&mut self) -> &'a str {
        let start = self.pos;
        let len = numeric_prefix_len(&self.src[start..], false);
        self.pos += len.max(1);
        &self.src[start..start + len]
    }
}

/// Byte length of the number at the start of `s`, or 0 when there is none.
///
/// Accepts `digits[.digits]`, `.digits` and `digits.`, optionally signed, with
/// an optional exponent; the same spellings `strtod` reads in decimal.
fn numeric_prefix_len(s: &str, signed: bool) -> usize {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(|b| b.is_ascii_digit()) {
            i += 1;
        }
        i
    };

    let start = usize::from(signed && matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(start);
    let mut has_digits = int_end > start;
    let mut end = int_end;
    if bytes.get(int_end) == Some(&b'.') {
        let frac_end = digits_from(int_end + 1);
        if has_digits || frac_end > int_end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }
    end
}

/// Numeric value of non-formula text: its longest leading number, so `12abc`
/// counts as 12. Text with no leading number, including words such as `inf`
/// or `nan`, has no value.
pub fn parse_literal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let len = numeric_prefix_len(trimmed, true);
    if len == 0 {
        return None;
    }
    trimmed[..len].parse::<f64>().ok()
}

/// Whether all of `raw`, apart from surrounding whitespace, is one number.
pub fn is_numeric(raw: &str) -> bool {
    let trimmed = raw.trim();
    !trimmed.is_empty() && numeric_prefix_len(trimmed, true) == trimmed.len()
}

/// One evaluation pass over a grid.
pub struct EvalContext<'g> {
    grid: &'g Grid,
    memo: HashMap<CellRef, f64>,
    visiting: HashSet<CellRef>,
    depth: usize,
}

impl<'g> EvalContext<'g> {
    pub fn new(grid: &'g Grid) -> Self {
        EvalContext {
            grid,
            memo: HashMap::new(),
            visiting: HashSet::new(),
            depth: 0,
        }
    }

    /// Evaluate raw cell text. Non-formula text evaluates as a number literal,
    /// or 0 when it is not one.
    pub fn evaluate(&mut self, raw: &str) -> Result<f64, EvalError> {
        self.begin();
        self.eval_text(raw)
    }

    /// Evaluate the cell at `cell_ref`, treating the cell itself as the root of
    /// the call chain so self-references are reported as cycles.
    pub fn evaluate_cell(&mut self, cell_ref: CellRef) -> Result<f64, EvalError> {
        self.begin();
        self.resolve(cell_ref)
    }

    /// Classify and evaluate a cell for display.
    ///
    /// Text that merely starts with a number still displays as text.
    pub fn value_of(&mut self, cell_ref: CellRef) -> CellValue {
        let raw = self.grid.get_ref(&cell_ref);
        if raw.is_empty() {
            return CellValue::Empty;
        }
        if self.grid.is_formula(cell_ref.row, cell_ref.col) {
            return match self.evaluate_cell(cell_ref) {
                Ok(n) => CellValue::Number(n),
                Err(e) => CellValue::Error(e),
            };
        }
        match parse_literal(&raw) {
            Some(n) if is_numeric(&raw) => CellValue::Number(n),
            _ => CellValue::Text(raw),
        }
    }

    #[cfg(test)]
    fn memoized(&self) -> usize {
        self.memo.len()
    }

    fn begin(&mut self) {
        self.visiting.clear();
        self.depth = 0;
    }

    fn eval_text(&mut self, raw: &str) -> Result<f64, EvalError> {
        let Some(body) = raw.strip_prefix('=') else {
            return Ok(parse_literal(raw).unwrap_or(0.0));
        };
        let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
        let mut src = Scanner {
            src: &compact,
            pos: 0,
        };
        self.eval_expr(&mut src)
    }

    fn eval_expr(&mut self, src: &mut Scanner<'_>) -> Result<f64, EvalError> {
        let mut acc = 0.0;
        let mut pending = Some(Op::Add);

        while let Some(b) = src.peek() {
            let operand = match b {
                b'(' => {
                    src.bump();
                    self.descend(|ctx| ctx.eval_expr(src))?
                }
                b')' => {
                    src.bump();
                    break;
                }
                b if b.is_ascii_alphabetic() => {
                    let token = src.take_while(|c| c.is_ascii_alphanumeric());
                    self.reference(token)?
                }
                b if b.is_ascii_digit() || b == b'.' => {
                    src.number().parse::<f64>().unwrap_or(0.0)
                }
                _ => {
                    // A later operator replaces an earlier one; anything else
                    // leaves no operator, so the next operand is dropped.
                    pending = Op::from_byte(b);
                    src.bump();
                    continue;
                }
            };
            if let Some(op) = pending.take() {
                acc = op.apply(acc, operand);
            }
        }
        Ok(acc)
    }

    fn reference(&mut self, token: &str) -> Result<f64, EvalError> {
        match CellRef::decode(token, self.grid.limits()) {
            Some(cell_ref) => self.resolve(cell_ref),
            None => {
                tracing::trace!(token, "unresolvable reference counts as 0");
                Ok(0.0)
            }
        }
    }

    fn resolve(&mut self, cell_ref: CellRef) -> Result<f64, EvalError> {
        if self.visiting.contains(&cell_ref) {
            tracing::debug!(cell = %cell_ref, "cycle detected");
            return Err(EvalError::Cycle(cell_ref));
        }
        if let Some(&value) = self.memo.get(&cell_ref) {
            return Ok(value);
        }
        self.prefetch(cell_ref)?;
        self.compute(cell_ref)
    }

    /// Evaluate everything `root` references, dependencies first, so that
    /// computing `root` finds them memoized. The walk keeps its own stack, so
    /// long reference chains do not deepen the call stack.
    fn prefetch(&mut self, root: CellRef) -> Result<(), EvalError> {
        let max = self.grid.limits().eval_depth();
        let mut path = vec![(root, self.references(root))];
        let mut on_path = HashSet::from([root]);

        loop {
            let Some((_, pending)) = path.last_mut() else {
                break;
            };
            match pending.pop() {
                Some(dep) => {
                    if self.memo.contains_key(&dep) {
                        continue;
                    }
                    if on_path.contains(&dep) || self.visiting.contains(&dep) {
                        tracing::debug!(cell = %dep, "cycle detected");
                        return Err(EvalError::Cycle(dep));
                    }
                    if self.depth + path.len() >= max {
                        return Err(EvalError::TooDeep(max));
                    }
                    let deps = self.references(dep);
                    on_path.insert(dep);
                    path.push((dep, deps));
                }
                None => {
                    if let Some((cell, _)) = path.pop() {
                        on_path.remove(&cell);
                        if cell != root {
                            self.compute(cell)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Cells named by the reference tokens of a formula cell, last token first.
    fn references(&self, cell_ref: CellRef) -> Vec<CellRef> {
        let raw = self.grid.get_ref(&cell_ref);
        let Some(body) = raw.strip_prefix('=') else {
            return Vec::new();
        };
        let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
        let mut src = Scanner {
            src: &compact,
            pos: 0,
        };
        let mut refs = Vec::new();
        while let Some(b) = src.peek() {
            if b.is_ascii_alphabetic() {
                let token = src.take_while(|c| c.is_ascii_alphanumeric());
                if let Some(dep) = CellRef::decode(token, self.grid.limits()) {
                    refs.push(dep);
                }
            } else if b.is_ascii_digit() || b == b'.' {
                src.number();
            } else {
                src.bump();
            }
        }
        refs.reverse();
        refs
    }

    /// Evaluate one cell's text and memoize the result.
    fn compute(&mut self, cell_ref: CellRef) -> Result<f64, EvalError> {
        let raw = self.grid.get_ref(&cell_ref);
        self.visiting.insert(cell_ref);
        let result = self.descend(|ctx| ctx.eval_text(&raw));
        self.visiting.remove(&cell_ref);

        let value = result?;
        self.memo.insert(cell_ref, value);
        Ok(value)
    }

    fn descend(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<f64, EvalError>,
    ) -> Result<f64, EvalError> {
        let max = self.grid.limits().eval_depth();
        if self.depth >= max {
            return Err(EvalError::TooDeep(max));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

/// Evaluate raw text against `grid` in a fresh pass.
pub fn evaluate(raw: &str, grid: &Grid) -> Result<f64, EvalError> {
    EvalContext::new(grid).evaluate(raw)
}

/// Evaluate the cell at `cell_ref` in a fresh pass.
pub fn evaluate_cell(grid: &Grid, cell_ref: CellRef) -> Result<f64, EvalError> {
    EvalContext::new(grid).evaluate_cell(cell_ref)
}
