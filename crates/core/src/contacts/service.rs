//! Contacts service - maps records to DreamFactory table calls

use std::sync::Arc;

use dfcontacts_domain::constants::{
    PARAM_FILTER, PARAM_ID_FIELD, PARAM_ORDER, PARAM_RELATED, RELATED_CONTACT, RESOURCE_KEY,
    TABLE_CONTACT, TABLE_CONTACT_GROUP, TABLE_CONTACT_GROUP_RELATIONSHIP, TABLE_CONTACT_INFO,
};
use dfcontacts_domain::{
    CallFailure, ContactDetailRecord, ContactRecord, GroupRecord, HttpMethod, LogicalCall,
};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::rest::client::RestClient;

type ServiceResult<T> = Result<T, CallFailure>;

const CONTACT_ORDER: &str = "last_name asc, first_name asc";

/// Contacts, groups and contact details stored in DreamFactory tables
pub struct ContactsService {
    client: Arc<RestClient>,
}

impl ContactsService {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<RestClient> {
        &self.client
    }

    /// All contacts, or the members of `group`, sorted by "Last, First"
    #[instrument(skip(self, group), fields(group = group.map(|g| g.id)))]
    pub async fn contacts(&self, group: Option<&GroupRecord>) -> ServiceResult<Vec<ContactRecord>> {
        let Some(group) = group else {
            let call = LogicalCall::get(TABLE_CONTACT).with_query(PARAM_ORDER, CONTACT_ORDER);
            let body = self.client.call(&call).await.into_result()?;
            return Ok(ContactRecord::from_json_array(resource_rows(body.as_ref())));
        };

        let call = LogicalCall::get(TABLE_CONTACT_GROUP_RELATIONSHIP)
            .with_query(PARAM_RELATED, RELATED_CONTACT)
            .with_query(PARAM_FILTER, format!("contact_group_id={}", group.id));
        let body = self.client.call(&call).await.into_result()?;

        let mut contacts: Vec<ContactRecord> = resource_rows(body.as_ref())
            .iter()
            .filter_map(|row| row.get(RELATED_CONTACT))
            .filter_map(ContactRecord::from_json)
            .collect();
        contacts.sort_by_cached_key(ContactRecord::full_name);
        debug!(count = contacts.len(), "Loaded group members");
        Ok(contacts)
    }

    #[instrument(skip(self))]
    pub async fn groups(&self) -> ServiceResult<Vec<GroupRecord>> {
        let body = self.client.call(&LogicalCall::get(TABLE_CONTACT_GROUP)).await.into_result()?;
        Ok(resource_rows(body.as_ref()).iter().filter_map(GroupRecord::from_json).collect())
    }

    #[instrument(skip(self))]
    pub async fn contact_details(&self, contact_id: i64) -> ServiceResult<Vec<ContactDetailRecord>> {
        let call = LogicalCall::get(TABLE_CONTACT_INFO)
            .with_query(PARAM_FILTER, format!("contact_id={contact_id}"));
        let body = self.client.call(&call).await.into_result()?;
        Ok(resource_rows(body.as_ref()).iter().filter_map(ContactDetailRecord::from_json).collect())
    }

    /// Create (no id) or update a contact; returns it with the server's id
    #[instrument(skip(self, contact), fields(id = contact.id))]
    pub async fn save_contact(&self, contact: &ContactRecord) -> ServiceResult<ContactRecord> {
        let id = self.save_row(TABLE_CONTACT, contact.is_new(), contact.to_json()).await?;
        Ok(ContactRecord { id: id.or(contact.id), ..contact.clone() })
    }

    /// Create (no id) or update a contact detail; returns it with the server's id
    #[instrument(skip(self, detail), fields(id = detail.id, contact_id = detail.contact_id))]
    pub async fn save_contact_detail(
        &self,
        detail: &ContactDetailRecord,
    ) -> ServiceResult<ContactDetailRecord> {
        let id = self.save_row(TABLE_CONTACT_INFO, detail.is_new(), detail.to_json()).await?;
        Ok(ContactDetailRecord { id: id.or(detail.id), ..detail.clone() })
    }

    #[instrument(skip(self))]
    pub async fn remove_contact_detail(&self, detail_id: i64) -> ServiceResult<()> {
        self.client.call(&delete_by_id(TABLE_CONTACT_INFO, detail_id)).await.into_result()?;
        Ok(())
    }

    /// Delete a contact together with its group memberships and details
    #[instrument(skip(self))]
    pub async fn remove_contact(&self, contact_id: i64) -> ServiceResult<()> {
        self.client.call_chain(&remove_contact_calls(contact_id)).await.into_result()?;
        Ok(())
    }

    async fn save_row(&self, table: &str, is_new: bool, row: Value) -> ServiceResult<Option<i64>> {
        let method = if is_new { HttpMethod::Post } else { HttpMethod::Patch };
        let call = LogicalCall::new(method, table).with_body(json!({ RESOURCE_KEY: [row] }));
        let body = self.client.call(&call).await.into_result()?;
        Ok(resource_rows(body.as_ref()).first().and_then(|row| row.get("id")).and_then(Value::as_i64))
    }
}

/// Calls removing a contact, ordered so dependent rows go first
pub fn remove_contact_calls(contact_id: i64) -> Vec<LogicalCall> {
    let by_contact = format!("contact_id={contact_id}");
    vec![
        LogicalCall::delete(TABLE_CONTACT_GROUP_RELATIONSHIP).with_query(PARAM_FILTER, by_contact.clone()),
        LogicalCall::delete(TABLE_CONTACT_INFO).with_query(PARAM_FILTER, by_contact),
        delete_by_id(TABLE_CONTACT, contact_id),
    ]
}

fn delete_by_id(table: &str, id: i64) -> LogicalCall {
    LogicalCall::delete(table)
        .with_query(PARAM_ID_FIELD, "id")
        .with_body(json!({ RESOURCE_KEY: [{ "id": id }] }))
}

fn resource_rows(body: Option<&Value>) -> &[Value] {
    body.and_then(|b| b.get(RESOURCE_KEY))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
