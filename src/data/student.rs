use crate::error::{
    InvalidEmailSnafu, InvalidPhoneNumberSnafu, MissingFieldSnafu, RosterResult,
};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, ensure};
use std::{ops::RangeInclusive, str::FromStr};

pub const PHONE_NUMBER_LENGTH: RangeInclusive<usize> = 10..=15;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
}

/// Body of a create request. Missing fields read as empty and fail validation.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
}

impl NewStudent {
    /// Trims every field and checks them in display order, reporting the first problem.
    pub fn validated(self) -> RosterResult<Self> {
        let Self {
            first_name,
            last_name,
            phone_number,
            email,
            address,
        } = self;

        let first_name = required(first_name, "First Name")?;
        let last_name = required(last_name, "Last Name")?;
        let phone_number = required(phone_number, "Phone Number")?;
        check_phone_number(&phone_number)?;
        let email = required(email, "Email")?;
        check_email(&email)?;
        let address = required(address, "Address")?;

        Ok(Self {
            first_name,
            last_name,
            phone_number,
            email,
            address,
        })
    }
}

/// Body of a partial update. Absent or empty fields leave the stored value alone.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl StudentPatch {
    pub fn validated(self) -> RosterResult<Self> {
        let provided = |field: Option<String>| {
            field
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let patch = Self {
            first_name: provided(self.first_name),
            last_name: provided(self.last_name),
            phone_number: provided(self.phone_number),
            email: provided(self.email),
            address: provided(self.address),
        };

        if let Some(phone_number) = &patch.phone_number {
            check_phone_number(phone_number)?;
        }
        if let Some(email) = &patch.email {
            check_email(email)?;
        }

        Ok(patch)
    }

    pub fn apply_to(self, student: &mut Student) {
        let Self {
            first_name,
            last_name,
            phone_number,
            email,
            address,
        } = self;

        for (new, old) in [
            (first_name, &mut student.first_name),
            (last_name, &mut student.last_name),
            (phone_number, &mut student.phone_number),
            (email, &mut student.email),
            (address, &mut student.address),
        ] {
            if let Some(new) = new {
                *old = new;
            }
        }
    }
}

fn required(value: String, field: &'static str) -> RosterResult<String> {
    let value = value.trim();
    ensure!(!value.is_empty(), MissingFieldSnafu { field });
    Ok(value.to_string())
}

fn check_phone_number(phone_number: &str) -> RosterResult<()> {
    let length = phone_number.chars().count();
    ensure!(
        PHONE_NUMBER_LENGTH.contains(&length),
        InvalidPhoneNumberSnafu { length }
    );
    Ok(())
}

fn check_email(email: &str) -> RosterResult<()> {
    EmailAddress::from_str(email).context(InvalidEmailSnafu)?;
    Ok(())
}
