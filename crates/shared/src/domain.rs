use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Yocto units in one NEAR.
pub const ONE_NEAR: u128 = 1_000_000_000_000_000_000_000_000;
const NEAR_NOMINATION_EXP: usize = 24;
pub const TERA_GAS: u64 = 1_000_000_000_000;

/// A validated NEAR account id, e.g. `calculator.testnet`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(raw: &str) -> Result<(), ValidationError> {
        let invalid = || ValidationError::InvalidAccountId(raw.to_string());
        if raw.len() < 2 || raw.len() > 64 {
            return Err(invalid());
        }
        let mut prev_separator = true;
        for c in raw.chars() {
            let is_separator = matches!(c, '-' | '_' | '.');
            if is_separator {
                if prev_separator {
                    return Err(invalid());
                }
            } else if !(c.is_ascii_lowercase() || c.is_ascii_digit()) {
                return Err(invalid());
            }
            prev_separator = is_separator;
        }
        if prev_separator {
            return Err(invalid());
        }
        Ok(())
    }
}

impl FromStr for AccountId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for AccountId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::validate(&value)?;
        Ok(Self(value))
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        AccountId::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    #[default]
    Testnet,
    Mainnet,
}

impl NetworkId {
    pub fn default_node_url(self) -> &'static str {
        match self {
            NetworkId::Testnet => "https://rpc.testnet.near.org",
            NetworkId::Mainnet => "https://rpc.mainnet.near.org",
        }
    }

    pub fn default_wallet_url(self) -> &'static str {
        match self {
            NetworkId::Testnet => "https://wallet.testnet.near.org",
            NetworkId::Mainnet => "https://app.mynearwallet.com",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NetworkId::Testnet => "testnet",
            NetworkId::Mainnet => "mainnet",
        }
    }
}

impl FromStr for NetworkId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "testnet" => Ok(NetworkId::Testnet),
            "mainnet" => Ok(NetworkId::Mainnet),
            other => Err(format!("unknown network '{other}'")),
        }
    }
}

/// Arithmetic operator understood by the calculator contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    #[default]
    None,
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub const SELECTABLE: [Operator; 5] = [
        Operator::None,
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Div,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::None => "NONE",
            Operator::Add => "ADD",
            Operator::Sub => "SUB",
            Operator::Mul => "MUL",
            Operator::Div => "DIV",
        }
    }

    pub fn symbol(self) -> Option<&'static str> {
        match self {
            Operator::None => None,
            Operator::Add => Some("+"),
            Operator::Sub => Some("-"),
            Operator::Mul => Some("*"),
            Operator::Div => Some("/"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Operator::None => "None",
            Operator::Add => "Add",
            Operator::Sub => "Sub",
            Operator::Mul => "Mul",
            Operator::Div => "Div",
        }
    }
}

impl FromStr for Operator {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" | "" => Ok(Operator::None),
            "ADD" | "+" => Ok(Operator::Add),
            "SUB" | "-" => Ok(Operator::Sub),
            "MUL" | "*" | "X" => Ok(Operator::Mul),
            "DIV" | "/" => Ok(Operator::Div),
            _ => Err(ValidationError::UnknownOperator(s.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last operation recorded by the contract for the signing account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperationResult {
    pub op_1: i32,
    pub op_2: i32,
    pub result: i32,
    pub operator: Operator,
}

impl fmt::Display for OperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator.symbol() {
            None => f.write_str("NONE"),
            Some(symbol) => write!(
                f,
                "{} {} {} = {}",
                self.op_1, symbol, self.op_2, self.result
            ),
        }
    }
}

/// A validated operation ready to be submitted once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRequest {
    pub op_1: i32,
    pub op_2: i32,
    pub operator: Operator,
}

impl OperationRequest {
    pub fn new(op_1: i32, op_2: i32, operator: Operator) -> Result<Self, ValidationError> {
        if operator == Operator::None {
            return Err(ValidationError::OperatorNotSelected);
        }
        if operator == Operator::Div && op_2 <= 0 {
            return Err(ValidationError::DivisionByZero);
        }
        Ok(Self {
            op_1,
            op_2,
            operator,
        })
    }
}

/// Gas allowance; NEAR encodes it as a decimal string in wallet actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Gas(pub u64);

impl Gas {
    pub const fn from_tgas(tgas: u64) -> Self {
        Self(tgas * TERA_GAS)
    }

    /// Like [`Gas::from_tgas`] for values read at run time.
    pub fn checked_from_tgas(tgas: u64) -> Result<Self, ValidationError> {
        tgas.checked_mul(TERA_GAS)
            .map(Self)
            .ok_or(ValidationError::GasOverflow(tgas))
    }
}

impl Default for Gas {
    fn default() -> Self {
        Gas::from_tgas(300)
    }
}

/// Amount in yoctoNEAR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Balance(pub u128);

impl Balance {
    pub const ZERO: Balance = Balance(0);

    pub const fn from_near(near: u128) -> Self {
        Self(near * ONE_NEAR)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! decimal_string_serde {
    ($name:ident, $inner:ty) => {
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse::<$inner>()
                    .map($name)
                    .map_err(serde::de::Error::custom)
            }
        }
    };
}

decimal_string_serde!(Gas, u64);
decimal_string_serde!(Balance, u128);

/// Converts a human NEAR amount ("1", "0.5") into yoctoNEAR.
pub fn parse_near_amount(amount: &str) -> Result<Balance, ValidationError> {
    let invalid = || ValidationError::InvalidAmount(amount.to_string());
    let cleaned = amount.trim().replace(',', "");
    let (whole, fraction) = match cleaned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (cleaned.as_str(), ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if fraction.len() > NEAR_NOMINATION_EXP
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }
    let digits = format!("{whole}{fraction:0<width$}", width = NEAR_NOMINATION_EXP);
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        return Ok(Balance::ZERO);
    }
    trimmed.parse::<u128>().map(Balance).map_err(|_| invalid())
}
