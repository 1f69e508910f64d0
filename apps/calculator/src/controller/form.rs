use shared::{
    domain::{OperationRequest, Operator},
    error::ValidationError,
};

/// Editable form contents. Operands stay raw text until submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub operand_1: String,
    pub operand_2: String,
    pub operator: Operator,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            operand_1: "0".to_string(),
            operand_2: "0".to_string(),
            operator: Operator::None,
        }
    }
}

impl FormState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The operator check runs first so an untouched form reports the
    /// missing operator rather than an operand problem.
    pub fn to_request(&self) -> Result<OperationRequest, ValidationError> {
        if self.operator == Operator::None {
            return Err(ValidationError::OperatorNotSelected);
        }
        let op_1 = parse_operand("op_1", &self.operand_1)?;
        let op_2 = parse_operand("op_2", &self.operand_2)?;
        OperationRequest::new(op_1, op_2, self.operator)
    }
}

fn parse_operand(field: &'static str, raw: &str) -> Result<i32, ValidationError> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::InvalidOperand {
            field,
            value: raw.to_string(),
        })
}
