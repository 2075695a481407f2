//! Request body schemas for each resource operation.

use super::validation::{FieldKind, FieldRule, Format, Schema};

const HANDLE: FieldRule = FieldRule::of(FieldKind::String).length(1, 25).format(Format::Lowercase);
const NON_EMPTY: FieldRule = FieldRule::of(FieldKind::String).min_length(1);
const TEXT: FieldRule = FieldRule::of(FieldKind::String).nullable();
const HEADCOUNT: FieldRule = FieldRule::of(FieldKind::Integer).nullable().range(Some(0.0), None);
const LOGO_URL: FieldRule = FieldRule::of(FieldKind::String).nullable().format(Format::Uri);
const SALARY: FieldRule = FieldRule::of(FieldKind::Integer).nullable().range(Some(0.0), None);
const EQUITY: FieldRule = FieldRule::of(FieldKind::Decimal).nullable().range(Some(0.0), Some(1.0));
const USERNAME: FieldRule = FieldRule::of(FieldKind::String).length(1, 30);
const PASSWORD: FieldRule = FieldRule::of(FieldKind::String).length(5, 20);
const PERSON_NAME: FieldRule = FieldRule::of(FieldKind::String).length(1, 30);
const EMAIL: FieldRule = FieldRule::of(FieldKind::String).length(6, 60).format(Format::Email);
const FLAG: FieldRule = FieldRule::of(FieldKind::Boolean);

pub const COMPANY_NEW: Schema = Schema {
    fields: &[
        ("handle", HANDLE.required()),
        ("name", NON_EMPTY.required()),
        ("description", TEXT),
        ("numEmployees", HEADCOUNT),
        ("logoUrl", LOGO_URL),
    ],
};

/// Handle is the key and cannot be patched.
pub const COMPANY_UPDATE: Schema = Schema {
    fields: &[
        ("name", NON_EMPTY),
        ("description", TEXT),
        ("numEmployees", HEADCOUNT),
        ("logoUrl", LOGO_URL),
    ],
};

pub const JOB_NEW: Schema = Schema {
    fields: &[
        ("title", NON_EMPTY.required()),
        ("salary", SALARY),
        ("equity", EQUITY),
        ("companyHandle", HANDLE.required()),
    ],
};

/// A job never moves between companies.
pub const JOB_UPDATE: Schema = Schema {
    fields: &[("title", NON_EMPTY), ("salary", SALARY), ("equity", EQUITY)],
};

pub const USER_AUTH: Schema = Schema {
    fields: &[
        ("username", USERNAME.required()),
        ("password", PASSWORD.required()),
    ],
};

pub const USER_REGISTER: Schema = Schema {
    fields: &[
        ("username", USERNAME.required()),
        ("password", PASSWORD.required()),
        ("firstName", PERSON_NAME.required()),
        ("lastName", PERSON_NAME.required()),
        ("email", EMAIL.required()),
    ],
};

/// Admin-only user creation; may set isAdmin.
pub const USER_NEW: Schema = Schema {
    fields: &[
        ("username", USERNAME.required()),
        ("password", PASSWORD.required()),
        ("firstName", PERSON_NAME.required()),
        ("lastName", PERSON_NAME.required()),
        ("email", EMAIL.required()),
        ("isAdmin", FLAG),
    ],
};

pub const USER_UPDATE: Schema = Schema {
    fields: &[
        ("password", PASSWORD),
        ("firstName", PERSON_NAME),
        ("lastName", PERSON_NAME),
        ("email", EMAIL),
        ("isAdmin", FLAG),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::service::RequestValidator;
    use serde_json::json;

    #[test]
    fn company_update_rejects_handle() {
        let res = RequestValidator::validate(json!({ "handle": "new" }), &COMPANY_UPDATE);
        assert!(matches!(res, Err(AppError::Validation(e)) if e == vec!["handle is not an allowed field".to_string()]));
    }

    #[test]
    fn handles_must_be_lower_case() {
        let res = RequestValidator::validate(json!({ "handle": "ABC", "name": "Upper" }), &COMPANY_NEW);
        assert!(matches!(res, Err(AppError::Validation(e)) if e == vec!["handle must be lower case".to_string()]));
        let res = RequestValidator::validate(json!({ "title": "T", "companyHandle": "Acme" }), &JOB_NEW);
        assert!(matches!(res, Err(AppError::Validation(e)) if e == vec!["companyHandle must be lower case".to_string()]));
        assert!(RequestValidator::validate(json!({ "handle": "acme-2", "name": "Acme" }), &COMPANY_NEW).is_ok());
    }

    #[test]
    fn equity_bound_is_exact() {
        let res = RequestValidator::validate(json!({ "equity": "1.00000000000000000001" }), &JOB_UPDATE);
        assert!(matches!(res, Err(AppError::Validation(e)) if e == vec!["equity must be at most 1".to_string()]));
        assert!(RequestValidator::validate(json!({ "equity": "1.0" }), &JOB_UPDATE).is_ok());
    }

    #[test]
    fn job_update_accepts_null_salary_and_equity() {
        let body = RequestValidator::validate(json!({ "salary": null, "equity": null }), &JOB_UPDATE).unwrap();
        assert_eq!(body.len(), 2);
    }

    #[test]
    fn job_update_rejects_company_move() {
        assert!(RequestValidator::validate(json!({ "companyHandle": "c2" }), &JOB_UPDATE).is_err());
    }

    #[test]
    fn empty_patch_passes_validation() {
        // "No data" is raised later, by the SET clause builder.
        assert!(RequestValidator::validate(json!({}), &COMPANY_UPDATE).unwrap().is_empty());
    }

    #[test]
    fn register_requires_all_profile_fields() {
        let res = RequestValidator::validate(json!({ "username": "u", "password": "secret1" }), &USER_REGISTER);
        match res {
            Err(AppError::Validation(e)) => assert_eq!(e.len(), 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn register_cannot_set_admin() {
        let body = json!({
            "username": "u", "password": "secret1", "firstName": "F",
            "lastName": "L", "email": "u@example.com", "isAdmin": true
        });
        assert!(RequestValidator::validate(body, &USER_REGISTER).is_err());
    }
}
