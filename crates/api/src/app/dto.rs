use axum::extract::rejection::JsonRejection;
use axum::Json;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

use vivaha_ledger::{
    AddPayment, Amount, Availability, CreateExpense, GuestDetails, MoneyReceived, UpdateExpense,
    UpdatePayment,
};

use crate::app::errors;

type Rejected = axum::response::Response;

// -------------------------
// Lenient input parsing
// -------------------------

/// Read a number given either as a JSON number or as text with a leading
/// numeric prefix (`"1200"`, `" 12.5 rupees"`). Anything else is `None`.
pub fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    }
}

fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_in = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits_in(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_in(end + 1);
        if frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_digits = digits_in(end + 1 + sign);
        if exp_digits > 0 {
            end += 1 + sign + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

fn lenient_amount(value: Option<&Value>) -> Option<Amount> {
    value.and_then(lenient_number)
}

/// Dates are ISO `YYYY-MM-DD` (an RFC 3339 timestamp is accepted too and
/// reduced to its date). An empty string means the field was omitted.
pub fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, Rejected> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    if let Ok(date) = raw.parse::<NaiveDate>() {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| {
            errors::bad_request(
                "invalid_date",
                format!("{field} must be a YYYY-MM-DD date, got {raw:?}"),
            )
        })
}

/// Payment positions arrive as path segments; only non-negative integers
/// are accepted.
pub fn parse_payment_index(raw: &str) -> Result<usize, Rejected> {
    raw.trim().parse::<usize>().map_err(|_| {
        errors::bad_request(
            "invalid_index",
            format!("payment index must be a non-negative integer, got {raw:?}"),
        )
    })
}

/// Unwrap a JSON body, turning every extractor rejection into a 400.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Rejected> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| errors::bad_request("invalid_body", rejection.body_text()))
}

fn lenient_count(field: &str, value: Option<&Value>) -> Result<Option<u32>, Rejected> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    match lenient_number(value) {
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) => Ok(Some(n as u32)),
        _ => Err(errors::bad_request(
            "invalid_count",
            format!("{field} must be a non-negative whole number"),
        )),
    }
}

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    #[serde(alias = "cost")]
    pub advance_amount: Option<Value>,
    pub paid_by: Option<String>,
    pub has_remaining: Option<bool>,
    pub remaining_amount: Option<Value>,
    pub remaining_date: Option<String>,
    pub remaining_notes: Option<String>,
    /// Older clients nest the remainder as `{amount, date, notes}`.
    pub remaining_payment: Option<RemainingPaymentRequest>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RemainingPaymentRequest {
    pub amount: Option<Value>,
    pub date: Option<String>,
    pub notes: Option<String>,
}

impl CreateExpenseRequest {
    pub fn into_command(self) -> Result<CreateExpense, Rejected> {
        let plan = self.remaining_payment.unwrap_or_default();
        let remaining_amount = self.remaining_amount.or(plan.amount);
        let remaining_date = self.remaining_date.or(plan.date);

        Ok(CreateExpense {
            category: self.category.unwrap_or_default(),
            sub_category: self.sub_category.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            date: parse_date("date", self.date.as_deref())?,
            advance_amount: lenient_amount(self.advance_amount.as_ref()).unwrap_or(0.0),
            paid_by: self.paid_by.unwrap_or_default(),
            has_remaining: self.has_remaining.unwrap_or(false),
            remaining_amount: lenient_amount(remaining_amount.as_ref()),
            remaining_date: parse_date("remainingDate", remaining_date.as_deref())?,
            remaining_notes: self.remaining_notes.or(plan.notes),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateExpenseRequest> for UpdateExpense {
    fn from(value: UpdateExpenseRequest) -> Self {
        Self {
            category: value.category,
            sub_category: value.sub_category,
            description: value.description,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPaymentRequest {
    pub amount: Option<Value>,
    pub paid_by: Option<String>,
    pub date: Option<String>,
    pub notes: Option<String>,
}

impl AddPaymentRequest {
    pub fn into_command(self) -> Result<AddPayment, Rejected> {
        let amount = lenient_amount(self.amount.as_ref())
            .filter(|a| *a > 0.0)
            .ok_or_else(|| {
                errors::bad_request("invalid_amount", "amount must be a positive number")
            })?;
        Ok(AddPayment {
            amount,
            paid_by: self.paid_by.unwrap_or_default(),
            date: parse_date("date", self.date.as_deref())?,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    pub amount: Option<Value>,
    pub paid_by: Option<String>,
    pub date: Option<String>,
    pub notes: Option<String>,
}

impl UpdatePaymentRequest {
    /// A non-numeric amount is ignored; a numeric one must be positive.
    pub fn into_command(self) -> Result<UpdatePayment, Rejected> {
        let amount = lenient_amount(self.amount.as_ref());
        if amount.is_some_and(|a| a <= 0.0) {
            return Err(errors::bad_request(
                "invalid_amount",
                "amount must be a positive number",
            ));
        }
        Ok(UpdatePayment {
            amount,
            paid_by: self.paid_by,
            date: parse_date("date", self.date.as_deref())?,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BudgetRequest {
    pub budget: Option<Value>,
}

impl BudgetRequest {
    /// Non-numeric input counts as zero.
    pub fn amount(&self) -> Amount {
        lenient_amount(self.budget.as_ref()).unwrap_or(0.0)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyReceivedRequest {
    pub money_received: Option<MoneyReceivedBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MoneyReceivedBody {
    pub ranjana: Option<Value>,
    pub mummy: Option<Value>,
    pub choti: Option<Value>,
}

impl MoneyReceivedRequest {
    /// Each contributor's amount is lenient; non-numeric counts as zero.
    pub fn into_money_received(self) -> Result<MoneyReceived, Rejected> {
        let body = self.money_received.ok_or_else(|| {
            errors::bad_request("invalid_body", "moneyReceived is required")
        })?;
        let read = |v: Option<Value>| lenient_amount(v.as_ref()).unwrap_or(0.0);
        Ok(MoneyReceived {
            ranjana: read(body.ranjana),
            mummy: read(body.mummy),
            choti: read(body.choti),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestRequest {
    pub name: Option<String>,
    pub count: Option<Value>,
    pub reception_count: Option<Value>,
    pub notes: Option<String>,
    pub room: Option<String>,
    pub availability: Option<Availability>,
}

impl GuestRequest {
    pub fn into_details(self) -> Result<GuestDetails, Rejected> {
        Ok(GuestDetails {
            name: self.name,
            count: lenient_count("count", self.count.as_ref())?,
            reception_count: lenient_count("receptionCount", self.reception_count.as_ref())?,
            notes: self.notes,
            room: self.room,
            availability: self.availability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_parse_like_parse_float() {
        assert_eq!(lenient_number(&json!(12.5)), Some(12.5));
        assert_eq!(lenient_number(&json!("300")), Some(300.0));
        assert_eq!(lenient_number(&json!("  42.75 rupees")), Some(42.75));
        assert_eq!(lenient_number(&json!("-7")), Some(-7.0));
        assert_eq!(lenient_number(&json!(".5")), Some(0.5));
        assert_eq!(lenient_number(&json!("5.")), Some(5.0));
        assert_eq!(lenient_number(&json!("1e3x")), Some(1000.0));
        assert_eq!(lenient_number(&json!("2e")), Some(2.0));
        assert_eq!(lenient_number(&json!("abc")), None);
        assert_eq!(lenient_number(&json!("-")), None);
        assert_eq!(lenient_number(&json!("")), None);
        assert_eq!(lenient_number(&json!(true)), None);
        assert_eq!(lenient_number(&Value::Null), None);
    }

    #[test]
    fn dates_accept_iso_and_treat_empty_as_omitted() {
        assert_eq!(parse_date("date", None).unwrap(), None);
        assert_eq!(parse_date("date", Some("")).unwrap(), None);
        assert_eq!(
            parse_date("date", Some("2025-02-14")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 14)
        );
        assert_eq!(
            parse_date("date", Some("2025-02-14T10:00:00Z")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 14)
        );
        assert!(parse_date("date", Some("14/02/2025")).is_err());
    }

    #[test]
    fn payment_index_must_be_a_non_negative_integer() {
        assert_eq!(parse_payment_index("2").unwrap(), 2);
        assert!(parse_payment_index("-1").is_err());
        assert!(parse_payment_index("one").is_err());
    }

    #[test]
    fn add_payment_requires_a_positive_amount() {
        let ok = AddPaymentRequest {
            amount: Some(json!("250")),
            ..AddPaymentRequest::default()
        }
        .into_command()
        .unwrap();
        assert_eq!(ok.amount, 250.0);

        for bad in [None, Some(json!(0)), Some(json!(-3)), Some(json!("lots"))] {
            let req = AddPaymentRequest {
                amount: bad,
                ..AddPaymentRequest::default()
            };
            assert!(req.into_command().is_err());
        }
    }

    #[test]
    fn update_payment_ignores_non_numeric_amounts() {
        let cmd = UpdatePaymentRequest {
            amount: Some(json!("n/a")),
            ..UpdatePaymentRequest::default()
        }
        .into_command()
        .unwrap();
        assert_eq!(cmd.amount, None);

        let req = UpdatePaymentRequest {
            amount: Some(json!(0)),
            ..UpdatePaymentRequest::default()
        };
        assert!(req.into_command().is_err());
    }

    #[test]
    fn create_request_reads_nested_remainder() {
        let req: CreateExpenseRequest = serde_json::from_value(json!({
            "category": "Catering",
            "cost": "800",
            "paidBy": "Mummy",
            "hasRemaining": true,
            "remainingPayment": { "amount": 1200, "date": "", "notes": "after event" }
        }))
        .unwrap();
        let cmd = req.into_command().unwrap();
        assert_eq!(cmd.advance_amount, 800.0);
        assert_eq!(cmd.remaining_amount, Some(1200.0));
        assert_eq!(cmd.remaining_date, None);
        assert_eq!(cmd.remaining_notes.as_deref(), Some("after event"));
    }

    #[test]
    fn create_request_treats_non_numeric_advance_as_zero() {
        let cmd = CreateExpenseRequest {
            advance_amount: Some(json!("free")),
            ..CreateExpenseRequest::default()
        }
        .into_command()
        .unwrap();
        assert_eq!(cmd.advance_amount, 0.0);
    }

    #[test]
    fn guest_counts_must_be_whole_numbers() {
        let details = GuestRequest {
            name: Some("Mehra".to_string()),
            count: Some(json!("3")),
            ..GuestRequest::default()
        }
        .into_details()
        .unwrap();
        assert_eq!(details.count, Some(3));

        let req = GuestRequest {
            count: Some(json!(2.5)),
            ..GuestRequest::default()
        };
        assert!(req.into_details().is_err());
    }
}
