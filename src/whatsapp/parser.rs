//! Parses free-text WhatsApp messages of the form
//! `Tipo, Categoría, Descripción, Monto, Fecha` into transactions.

use crate::transaction::{NewTransaction, TransactionType};

/// The message layout shown to clients when a message cannot be parsed.
pub const MESSAGE_FORMAT: &str = "Tipo, Categoría, Descripción, Monto, Fecha";

/// The number of comma-separated segments a message needs at minimum.
const MIN_SEGMENTS: usize = 5;

/// How the parser treats a type token that is neither `Ingreso` nor `Gasto`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownTypePolicy {
    /// Anything other than `Gasto` is recorded as income.
    #[default]
    DefaultToIncome,
    /// Only `Ingreso` and `Gasto` are accepted.
    Strict,
}

/// The reasons a message could not be turned into a transaction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The message had fewer than five comma-separated segments.
    #[error("expected at least 5 comma-separated segments, got {0}")]
    TooFewSegments(usize),

    /// A required segment was empty after trimming.
    #[error("the {0} segment is empty")]
    EmptyField(&'static str),

    /// The amount segment is not a finite number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The type segment was not recognised and [UnknownTypePolicy::Strict]
    /// is in effect.
    #[error("\"{0}\" is not a transaction type, expected \"Ingreso\" or \"Gasto\"")]
    UnknownType(String),
}

/// Parse `message` into a new transaction.
///
/// The message is split on commas and each segment is trimmed. The first four
/// segments are the type, category, description and amount; everything after
/// them is joined back together with commas to form the date, so dates that
/// contain commas or trailing text are kept verbatim. Messages never create
/// fixed transactions.
///
/// ```
/// use ahorrapp::{TransactionType, whatsapp::{UnknownTypePolicy, parse_message}};
///
/// let transaction =
///     parse_message("Gasto, comida, bembos, 22.90, 4-2-25", UnknownTypePolicy::default())
///         .unwrap();
///
/// assert_eq!(transaction.transaction_type, TransactionType::Gasto);
/// assert_eq!(transaction.amount, -22.9);
/// assert_eq!(transaction.date, "4-2-25");
/// ```
///
/// # Errors
/// Returns a [ParseError] if there are fewer than five segments, if a
/// segment is empty, if the amount is not a number, or if the type is
/// unknown under [UnknownTypePolicy::Strict].
pub fn parse_message(
    message: &str,
    unknown_type_policy: UnknownTypePolicy,
) -> Result<NewTransaction, ParseError> {
    let segments: Vec<&str> = message.split(',').map(str::trim).collect();

    if segments.len() < MIN_SEGMENTS {
        return Err(ParseError::TooFewSegments(segments.len()));
    }

    let type_token = non_empty(segments[0], "type")?;
    let category = non_empty(segments[1], "category")?;
    let description = non_empty(segments[2], "description")?;
    let amount = parse_amount(segments[3])?;
    let date = segments[4..].join(",");
    let date = non_empty(date.trim(), "date")?;

    let transaction_type = parse_type(type_token, unknown_type_policy)?;

    Ok(NewTransaction {
        description: description.to_owned(),
        amount: transaction_type.signed(amount),
        category: category.to_owned(),
        date: date.to_owned(),
        is_fixed: false,
        transaction_type,
    })
}

fn non_empty<'a>(segment: &'a str, field_name: &'static str) -> Result<&'a str, ParseError> {
    if segment.is_empty() {
        Err(ParseError::EmptyField(field_name))
    } else {
        Ok(segment)
    }
}

fn parse_amount(segment: &str) -> Result<f64, ParseError> {
    match segment.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(ParseError::InvalidAmount(segment.to_owned())),
    }
}

pub(crate) fn parse_type(token: &str, policy: UnknownTypePolicy) -> Result<TransactionType, ParseError> {
    match (token.parse::<TransactionType>(), policy) {
        (Ok(transaction_type), _) => Ok(transaction_type),
        (Err(_), UnknownTypePolicy::DefaultToIncome) => {
            tracing::debug!("treating unknown type \"{token}\" as income");
            Ok(TransactionType::Ingreso)
        }
        (Err(_), UnknownTypePolicy::Strict) => Err(ParseError::UnknownType(token.to_owned())),
    }
}
