//! Create contact request command
//!
//! Submitted by the public contact form.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::contact_requests::types::{
    ContactRequestRecord, CONTACT_REQUEST_COLUMNS, MAX_NAME_LENGTH, MAX_PHONE_NUMBER_LENGTH,
};
use crate::features::shared::validation::{validate_required_text, FieldValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContactRequestCommand {
    pub name: String,
    pub nationality: String,
    #[serde(alias = "phoneNumber")]
    pub phone_number: String,
    #[serde(alias = "destinationCountry")]
    pub destination_country: String,
}

pub type CreateContactRequestResponse = ContactRequestRecord;

#[derive(Debug, thiserror::Error)]
pub enum CreateContactRequestError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldValidationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateContactRequestCommand {
    pub fn validate(&self) -> Result<(), CreateContactRequestError> {
        validate_required_text("name", &self.name, MAX_NAME_LENGTH)?;
        validate_required_text("nationality", &self.nationality, MAX_NAME_LENGTH)?;
        validate_required_text("phone_number", &self.phone_number, MAX_PHONE_NUMBER_LENGTH)?;
        validate_required_text(
            "destination_country",
            &self.destination_country,
            MAX_NAME_LENGTH,
        )?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command))]
pub async fn handle(
    pool: PgPool,
    command: CreateContactRequestCommand,
) -> Result<CreateContactRequestResponse, CreateContactRequestError> {
    command.validate()?;

    let sql = format!(
        r#"
        INSERT INTO contact_requests (name, nationality, phone_number, destination_country)
        VALUES ($1, $2, $3, $4)
        RETURNING {}
        "#,
        CONTACT_REQUEST_COLUMNS
    );
    let record = sqlx::query_as::<_, ContactRequestRecord>(&sql)
        .bind(command.name.trim())
        .bind(command.nationality.trim())
        .bind(command.phone_number.trim())
        .bind(command.destination_country.trim())
        .fetch_one(&pool)
        .await?;

    tracing::info!(contact_request_id = record.id, "Contact request received");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> CreateContactRequestCommand {
        CreateContactRequestCommand {
            name: "Layla Ahmad".to_string(),
            nationality: "أردني".to_string(),
            phone_number: "+962 7 9000 0000".to_string(),
            destination_country: "الولايات المتحدة".to_string(),
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(command().validate().is_ok());
    }

    #[test]
    fn test_camel_case_body() {
        let cmd: CreateContactRequestCommand = serde_json::from_str(
            r#"{"name": "Sam", "nationality": "UK", "phoneNumber": "123", "destinationCountry": "usa"}"#,
        )
        .unwrap();
        assert_eq!(cmd.phone_number, "123");
        assert_eq!(cmd.destination_country, "usa");
    }

    #[test]
    fn test_validation_reports_missing_field() {
        let mut cmd = command();
        cmd.destination_country = " ".to_string();
        assert!(matches!(
            cmd.validate(),
            Err(CreateContactRequestError::Validation(FieldValidationError::Required {
                field: "destination_country"
            }))
        ));
    }

    #[test]
    fn test_validation_phone_too_long() {
        let mut cmd = command();
        cmd.phone_number = "9".repeat(51);
        assert!(matches!(
            cmd.validate(),
            Err(CreateContactRequestError::Validation(FieldValidationError::TooLong { .. }))
        ));
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_handle_trims_and_stores(pool: PgPool) -> sqlx::Result<()> {
        let mut cmd = command();
        cmd.name = "  Layla Ahmad ".to_string();
        let record = handle(pool, cmd).await.unwrap();
        assert_eq!(record.name, "Layla Ahmad");
        assert_eq!(record.destination_country, "الولايات المتحدة");
        Ok(())
    }
}
