//! Pure calculator state machine.
//!
//! The display is the source of truth: digits and results are strings, the
//! pending operand is parsed from the display when an operator arrives.
//! Division by zero poisons the display with the literal `Error`, which the
//! next digit replaces.

use serde::{Deserialize, Serialize};

/// Binary operator tokens, serialized as their arithmetic symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition.
    #[serde(rename = "+")]
    Add,
    /// Subtraction.
    #[serde(rename = "-")]
    Subtract,
    /// Multiplication.
    #[serde(rename = "*")]
    Multiply,
    /// Division.
    #[serde(rename = "/")]
    Divide,
}

impl BinaryOp {
    /// Parses an operator symbol off the wire.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "*" => Some(Self::Multiply),
            "/" => Some(Self::Divide),
            _ => None,
        }
    }
}

/// One calculator interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalcAction {
    /// A digit key, `0..=9`.
    Digit(char),
    /// The decimal point key.
    Decimal,
    /// An operator key.
    Operator(BinaryOp),
    /// The equals key.
    Equals,
    /// The clear key.
    Clear,
}

/// Calculator window state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorState {
    /// Current display text.
    pub display_value: String,
    /// Left operand captured when an operator was pressed.
    pub previous_value: Option<f64>,
    /// Pending operator.
    pub operator: Option<BinaryOp>,
    /// Whether the next digit starts a fresh entry.
    pub waiting_for_operand: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            display_value: "0".to_string(),
            previous_value: None,
            operator: None,
            waiting_for_operand: false,
        }
    }
}

/// `None` signals the divide-by-zero error display.
fn compute(prev: f64, op: BinaryOp, current: f64) -> Option<f64> {
    match op {
        BinaryOp::Add => Some(prev + current),
        BinaryOp::Subtract => Some(prev - current),
        BinaryOp::Multiply => Some(prev * current),
        BinaryOp::Divide => {
            if current == 0.0 {
                None
            } else {
                Some(prev / current)
            }
        }
    }
}

impl CalculatorState {
    fn current_operand(&self) -> f64 {
        self.display_value.parse().unwrap_or(f64::NAN)
    }

    /// Applies one interaction.
    pub fn apply(&mut self, action: CalcAction) {
        match action {
            CalcAction::Digit(digit) => {
                if self.waiting_for_operand {
                    self.display_value = digit.to_string();
                    self.waiting_for_operand = false;
                } else if self.display_value == "0" || self.display_value == "Error" {
                    self.display_value = digit.to_string();
                } else {
                    self.display_value.push(digit);
                }
            }
            CalcAction::Decimal => {
                if !self.display_value.contains('.') {
                    self.display_value.push('.');
                }
            }
            CalcAction::Operator(op) => {
                if let (Some(prev), Some(pending)) = (self.previous_value, self.operator) {
                    if !self.waiting_for_operand {
                        let result = compute(prev, pending, self.current_operand());
                        self.display_value = result
                            .map(|v| v.to_string())
                            .unwrap_or_else(|| "Error".to_string());
                        self.previous_value = result;
                    } else {
                        self.previous_value = Some(self.current_operand());
                    }
                } else {
                    self.previous_value = Some(self.current_operand());
                }
                self.waiting_for_operand = true;
                self.operator = Some(op);
            }
            CalcAction::Equals => {
                if let (Some(prev), Some(pending)) = (self.previous_value, self.operator) {
                    let result = compute(prev, pending, self.current_operand());
                    self.display_value = result
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "Error".to_string());
                    self.previous_value = None;
                    self.operator = None;
                    self.waiting_for_operand = true;
                }
            }
            CalcAction::Clear => *self = Self::default(),
        }
    }
}
