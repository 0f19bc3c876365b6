//! Form fields and the record holding their values.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// A named field of the dispute form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    ConsigneeData,
    RequestReason,
    Bl,
    ContainerInfo,
    FreeTimeGranted,
    DischargeDate,
    FirstReturnAttemptDate,
    ContainerReturnDate,
    ReturnTerminalCity,
    OccurrenceSummary,
}

impl FormField {
    /// Every field, in the order the form presents them.
    pub const ALL: [FormField; 10] = [
        FormField::ConsigneeData,
        FormField::RequestReason,
        FormField::Bl,
        FormField::ContainerInfo,
        FormField::FreeTimeGranted,
        FormField::DischargeDate,
        FormField::FirstReturnAttemptDate,
        FormField::ContainerReturnDate,
        FormField::ReturnTerminalCity,
        FormField::OccurrenceSummary,
    ];

    /// Name used on the wire (multipart part name and JSON property).
    pub fn wire_name(self) -> &'static str {
        match self {
            FormField::ConsigneeData => "consigneeData",
            FormField::RequestReason => "requestReason",
            FormField::Bl => "bl",
            FormField::ContainerInfo => "containerInfo",
            FormField::FreeTimeGranted => "freeTimeGranted",
            FormField::DischargeDate => "dischargeDate",
            FormField::FirstReturnAttemptDate => "firstReturnAttemptDate",
            FormField::ContainerReturnDate => "containerReturnDate",
            FormField::ReturnTerminalCity => "returnTerminalCity",
            FormField::OccurrenceSummary => "occurrenceSummary",
        }
    }

    /// Question label shown next to the input. Question 10 is the attachment picker.
    pub fn label(self) -> &'static str {
        match self {
            FormField::ConsigneeData => "1. Consignee data as stated on the BL",
            FormField::RequestReason => "2. Reason for the request",
            FormField::Bl => "3. BL",
            FormField::ContainerInfo => "4. Container number",
            FormField::FreeTimeGranted => "5. Free time granted",
            FormField::DischargeDate => "6. Discharge date",
            FormField::FirstReturnAttemptDate => "7. First return attempt date (if applicable)",
            FormField::ContainerReturnDate => "8. Container return date",
            FormField::ReturnTerminalCity => "9. Return terminal (name and city)",
            FormField::OccurrenceSummary => "11. Brief summary of the occurrence",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, FormField::FirstReturnAttemptDate)
    }
}

impl Display for FormField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.wire_name())
    }
}

impl FromStr for FormField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.wire_name() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown form field: {}", s))
    }
}

/// Values of every form field. Missing values are empty strings.
///
/// Serializes with the wire names, so it can be flattened directly into the
/// JSON submission body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormRecord {
    pub consignee_data: String,
    pub request_reason: String,
    pub bl: String,
    pub container_info: String,
    pub free_time_granted: String,
    pub discharge_date: String,
    pub first_return_attempt_date: String,
    pub container_return_date: String,
    pub return_terminal_city: String,
    pub occurrence_summary: String,
}

impl FormRecord {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::ConsigneeData => &self.consignee_data,
            FormField::RequestReason => &self.request_reason,
            FormField::Bl => &self.bl,
            FormField::ContainerInfo => &self.container_info,
            FormField::FreeTimeGranted => &self.free_time_granted,
            FormField::DischargeDate => &self.discharge_date,
            FormField::FirstReturnAttemptDate => &self.first_return_attempt_date,
            FormField::ContainerReturnDate => &self.container_return_date,
            FormField::ReturnTerminalCity => &self.return_terminal_city,
            FormField::OccurrenceSummary => &self.occurrence_summary,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        let slot = match field {
            FormField::ConsigneeData => &mut self.consignee_data,
            FormField::RequestReason => &mut self.request_reason,
            FormField::Bl => &mut self.bl,
            FormField::ContainerInfo => &mut self.container_info,
            FormField::FreeTimeGranted => &mut self.free_time_granted,
            FormField::DischargeDate => &mut self.discharge_date,
            FormField::FirstReturnAttemptDate => &mut self.first_return_attempt_date,
            FormField::ContainerReturnDate => &mut self.container_return_date,
            FormField::ReturnTerminalCity => &mut self.return_terminal_city,
            FormField::OccurrenceSummary => &mut self.occurrence_summary,
        };
        *slot = value;
    }

    /// (field, value) pairs in presentation order.
    pub fn entries(&self) -> impl Iterator<Item = (FormField, &str)> + '_ {
        FormField::ALL.into_iter().map(move |field| (field, self.get(field)))
    }

    /// Required fields whose value is empty or whitespace only.
    pub fn missing_required(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|field| field.is_required() && self.get(*field).trim().is_empty())
            .collect()
    }

    /// Identifier used to group a submission's files in storage: the BL,
    /// falling back to the container number.
    pub fn shipment_identifier(&self) -> &str {
        if self.bl.trim().is_empty() {
            self.container_info.trim()
        } else {
            self.bl.trim()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for field in FormField::ALL {
            assert_eq!(field.wire_name().parse::<FormField>().unwrap(), field);
        }
        assert!("arquivo".parse::<FormField>().is_err());
    }

    #[test]
    fn only_first_return_attempt_is_optional() {
        let optional: Vec<_> = FormField::ALL
            .into_iter()
            .filter(|f| !f.is_required())
            .collect();
        assert_eq!(optional, vec![FormField::FirstReturnAttemptDate]);
    }

    #[test]
    fn missing_required_ignores_optional_field() {
        let mut record = FormRecord::default();
        for field in FormField::ALL {
            if field.is_required() {
                record.set(field, "x".to_string());
            }
        }
        assert!(record.missing_required().is_empty());

        record.set(FormField::DischargeDate, "   ".to_string());
        assert_eq!(record.missing_required(), vec![FormField::DischargeDate]);
    }

    #[test]
    fn serializes_with_wire_names() {
        let mut record = FormRecord::default();
        record.set(FormField::Bl, "MSCU1234567".to_string());
        record.set(FormField::ReturnTerminalCity, "Santos".to_string());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["bl"], "MSCU1234567");
        assert_eq!(json["returnTerminalCity"], "Santos");
        assert_eq!(json["firstReturnAttemptDate"], "");
        assert_eq!(json.as_object().unwrap().len(), FormField::ALL.len());
    }

    #[test]
    fn shipment_identifier_falls_back_to_container() {
        let mut record = FormRecord::default();
        record.set(FormField::ContainerInfo, " MSCU1234567 ".to_string());
        assert_eq!(record.shipment_identifier(), "MSCU1234567");

        record.set(FormField::Bl, "BL-99".to_string());
        assert_eq!(record.shipment_identifier(), "BL-99");
    }
}
