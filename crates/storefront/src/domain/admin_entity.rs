//! Static description of every table the admin console can reach.
//!
//! Table and column names used to build admin SQL come only from this
//! registry; client-supplied keys are checked against it first.

use serde_json::{Map, Value};
use shared::errors::ServiceError;

#[derive(Debug)]
pub struct AdminEntity {
    /// Path segment under `/api/admin/`.
    pub name: &'static str,
    pub table: &'static str,
    pub id_column: &'static str,
    pub search_columns: &'static [&'static str],
    pub status_column: Option<&'static str>,
    pub updatable: &'static [&'static str],
    /// `None` for entities that are only created by the storefront itself.
    pub creatable: Option<&'static [&'static str]>,
    pub required_on_create: &'static [&'static str],
    /// `(table, column)` pairs whose rows block deletion.
    pub references: &'static [(&'static str, &'static str)],
    pub order_by: &'static str,
}

const JURISDICTION_FIELDS: &[&str] = &[
    "name",
    "slug",
    "country",
    "description",
    "price",
    "currency",
    "formation_days",
    "features",
    "is_active",
];

const SERVICE_FIELDS: &[&str] = &[
    "name",
    "slug",
    "category",
    "description",
    "price",
    "currency",
    "is_active",
];

const PROFESSIONAL_SERVICE_FIELDS: &[&str] = &[
    "name",
    "slug",
    "description",
    "price",
    "currency",
    "is_active",
];

const BANKING_JURISDICTION_FIELDS: &[&str] = &[
    "name",
    "country",
    "description",
    "price",
    "currency",
    "features",
    "is_active",
];

pub static ADMIN_ENTITIES: &[AdminEntity] = &[
    AdminEntity {
        name: "jurisdictions",
        table: "jurisdictions",
        id_column: "id",
        search_columns: &["name", "slug", "country"],
        status_column: None,
        updatable: JURISDICTION_FIELDS,
        creatable: Some(JURISDICTION_FIELDS),
        required_on_create: &["name", "slug"],
        references: &[("applications", "jurisdiction_id")],
        order_by: "t.name ASC",
    },
    AdminEntity {
        name: "services",
        table: "services",
        id_column: "id",
        search_columns: &["name", "slug", "category"],
        status_column: None,
        updatable: SERVICE_FIELDS,
        creatable: Some(SERVICE_FIELDS),
        required_on_create: &["name", "slug"],
        references: &[],
        order_by: "t.name ASC",
    },
    AdminEntity {
        name: "professional-services",
        table: "professional_services",
        id_column: "id",
        search_columns: &["name", "slug"],
        status_column: None,
        updatable: PROFESSIONAL_SERVICE_FIELDS,
        creatable: Some(PROFESSIONAL_SERVICE_FIELDS),
        required_on_create: &["name", "slug"],
        references: &[],
        order_by: "t.name ASC",
    },
    AdminEntity {
        name: "applications",
        table: "applications",
        id_column: "id",
        search_columns: &["company_name", "contact_name", "contact_email"],
        status_column: Some("status"),
        updatable: &[
            "status",
            "admin_notes",
            "company_name",
            "contact_name",
            "contact_email",
            "contact_phone",
        ],
        creatable: None,
        required_on_create: &[],
        references: &[],
        order_by: "t.created_at DESC",
    },
    AdminEntity {
        name: "orders",
        table: "orders",
        id_column: "order_id",
        search_columns: &["order_id", "customer_name", "customer_email"],
        status_column: Some("payment_status"),
        updatable: &[
            "customer_name",
            "customer_email",
            "customer_phone",
            "admin_notes",
        ],
        creatable: None,
        required_on_create: &[],
        references: &[("order_items", "order_id"), ("applications", "order_id")],
        order_by: "t.created_at DESC",
    },
    AdminEntity {
        name: "banking-jurisdictions",
        table: "banking_jurisdictions",
        id_column: "id",
        search_columns: &["name", "country"],
        status_column: None,
        updatable: BANKING_JURISDICTION_FIELDS,
        creatable: Some(BANKING_JURISDICTION_FIELDS),
        required_on_create: &["name"],
        references: &[],
        order_by: "t.name ASC",
    },
    AdminEntity {
        name: "mail-forwarding-applications",
        table: "mail_forwarding_applications",
        id_column: "id",
        search_columns: &["contact_name", "contact_email", "company_name"],
        status_column: Some("status"),
        updatable: &[
            "status",
            "admin_notes",
            "contact_name",
            "contact_email",
            "contact_phone",
            "company_name",
            "forwarding_address",
            "plan",
        ],
        creatable: None,
        required_on_create: &[],
        references: &[],
        order_by: "t.created_at DESC",
    },
    AdminEntity {
        name: "trust-formation-applications",
        table: "trust_formation_applications",
        id_column: "id",
        search_columns: &["trust_name", "settlor_name", "contact_email"],
        status_column: Some("status"),
        updatable: &[
            "status",
            "admin_notes",
            "trust_name",
            "trust_type",
            "settlor_name",
            "contact_email",
            "contact_phone",
        ],
        creatable: None,
        required_on_create: &[],
        references: &[],
        order_by: "t.created_at DESC",
    },
];

impl AdminEntity {
    pub fn find(name: &str) -> Option<&'static AdminEntity> {
        ADMIN_ENTITIES.iter().find(|entity| entity.name == name)
    }

    pub fn is_creatable(&self) -> bool {
        self.creatable.is_some()
    }

    /// Columns to write for a partial update, in allow-list order.
    pub fn update_columns(
        &self,
        fields: &Map<String, Value>,
    ) -> Result<Vec<&'static str>, ServiceError> {
        if fields.is_empty() {
            return Err(ServiceError::Validation(vec![format!(
                "No fields to update. Allowed fields: {}",
                self.updatable.join(", ")
            )]));
        }

        reject_unknown(fields, self.updatable)?;

        Ok(self
            .updatable
            .iter()
            .copied()
            .filter(|column| fields.contains_key(*column))
            .collect())
    }

    pub fn create_columns(
        &self,
        fields: &Map<String, Value>,
    ) -> Result<Vec<&'static str>, ServiceError> {
        let Some(allowed) = self.creatable else {
            return Err(ServiceError::Validation(vec![format!(
                "{} cannot be created from the admin console",
                self.name
            )]));
        };

        reject_unknown(fields, allowed)?;

        let missing: Vec<String> = self
            .required_on_create
            .iter()
            .filter(|column| fields.get(**column).is_none_or(Value::is_null))
            .map(|column| format!("{column}: field is required"))
            .collect();

        if !missing.is_empty() {
            return Err(ServiceError::Validation(missing));
        }

        Ok(allowed
            .iter()
            .copied()
            .filter(|column| fields.contains_key(*column))
            .collect())
    }
}

fn reject_unknown(fields: &Map<String, Value>, allowed: &[&str]) -> Result<(), ServiceError> {
    let unknown: Vec<String> = fields
        .keys()
        .filter(|key| !allowed.contains(&key.as_str()))
        .map(|key| format!("{key}: field is not editable"))
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation(unknown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn every_entity_segment_resolves() {
        for name in [
            "jurisdictions",
            "services",
            "professional-services",
            "applications",
            "orders",
            "banking-jurisdictions",
            "mail-forwarding-applications",
            "trust-formation-applications",
        ] {
            assert!(AdminEntity::find(name).is_some(), "{name} is not registered");
        }
        assert!(AdminEntity::find("users").is_none());
    }

    #[test]
    fn order_updates_are_limited_to_contact_fields() {
        let orders = AdminEntity::find("orders").unwrap();

        let columns = orders
            .update_columns(&fields(json!({ "admin_notes": "called customer" })))
            .unwrap();
        assert_eq!(columns, vec!["admin_notes"]);

        let err = orders
            .update_columns(&fields(json!({ "payment_status": "paid", "admin_notes": "x" })))
            .unwrap_err();
        match err {
            ServiceError::Validation(errors) => {
                assert_eq!(errors, vec!["payment_status: field is not editable"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn empty_update_is_rejected() {
        let services = AdminEntity::find("services").unwrap();
        assert!(matches!(
            services.update_columns(&Map::new()),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn only_catalog_entities_are_creatable() {
        let applications = AdminEntity::find("applications").unwrap();
        assert!(!applications.is_creatable());
        assert!(
            applications
                .create_columns(&fields(json!({ "company_name": "Acme" })))
                .is_err()
        );

        let jurisdictions = AdminEntity::find("jurisdictions").unwrap();
        let columns = jurisdictions
            .create_columns(&fields(json!({ "slug": "bvi", "name": "BVI", "price": 599 })))
            .unwrap();
        assert_eq!(columns, vec!["name", "slug", "price"]);
    }

    #[test]
    fn create_requires_mandatory_columns() {
        let jurisdictions = AdminEntity::find("jurisdictions").unwrap();
        let err = jurisdictions
            .create_columns(&fields(json!({ "name": "Belize", "slug": null })))
            .unwrap_err();
        match err {
            ServiceError::Validation(errors) => {
                assert_eq!(errors, vec!["slug: field is required"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
