//! Consent update.
//!
//! The request carries a fixed 281-character prefix followed by one
//! 22-character block per consent. The response is a 122-character record
//! whose only meaningful field is the two-digit status.

use serde::{Deserialize, Serialize};

use crate::codec::{split_body, Field, Layout, ProtocolError, RecordReader};
use crate::error::{ErrorKind, ErrorTable};
use crate::operations::{limit, limit_to, require, Operation};

const ID_CARD_NO: Field = Field::text("IDCardNo", 0, 20);
const ACTION_CHANNEL: Field = Field::text("ActionChannel", 20, 3);
const ACTION_DATE_TIME: Field = Field::text("ActionDateTime", 23, 14);
const APPLICATION_NO: Field = Field::text("ApplicationNo", 37, 20);
const APPLICATION_VERSION: Field = Field::text("ApplicationVersion", 57, 13);
const IP_ADDRESS: Field = Field::text("IPAddress", 70, 50);
const ATM_NO: Field = Field::text("ATMNo", 120, 5);
const BRANCH_CODE: Field = Field::text("BranchCode", 125, 4);
const VOICE_PATH: Field = Field::text("VoicePath", 129, 150);
const TOTAL_OF_CONSENT_CODE: Field = Field::integer("TotalOfConsentCode", 279, 2);

static CONSENT_REQUEST: Layout = Layout {
    name: "UpdateConsentRequest",
    length: 281,
    fields: &[
        ID_CARD_NO,
        ACTION_CHANNEL,
        ACTION_DATE_TIME,
        APPLICATION_NO,
        APPLICATION_VERSION,
        IP_ADDRESS,
        ATM_NO,
        BRANCH_CODE,
        VOICE_PATH,
        TOTAL_OF_CONSENT_CODE,
    ],
};

const CONSENT_FORM: Field = Field::text("ConsentForm", 0, 3);
const CONSENT_CODE: Field = Field::text("ConsentCode", 3, 3);
const CONSENT_FORM_VERSION: Field = Field::text("ConsentFormVersion", 6, 13);
const CONSENT_LANGUAGE: Field = Field::text("ConsentLanguage", 19, 1);
const CONSENT_STATUS: Field = Field::text("ConsentStatus", 20, 2);

static CONSENT_ITEM: Layout = Layout {
    name: "ConsentItem",
    length: 22,
    fields: &[CONSENT_FORM, CONSENT_CODE, CONSENT_FORM_VERSION, CONSENT_LANGUAGE, CONSENT_STATUS],
};

const RS_ID_CARD_NO: Field = Field::text("IDCardNo", 0, 20);
const RS_APPLICATION_NO: Field = Field::text("ApplicationNo", 20, 20);
const RS_STATUS: Field = Field::text("Status", 40, 2);
const RS_FILLER: Field = Field::text("Filler", 42, 80);

static CONSENT_RESPONSE: Layout = Layout {
    name: "UpdateConsentResponse",
    length: 122,
    fields: &[RS_ID_CARD_NO, RS_APPLICATION_NO, RS_STATUS, RS_FILLER],
};

/// Caller channel code, one character; not part of the System I record.
const MAX_CHANNEL_LENGTH: usize = 1;

static CONSENT_ERRORS: ErrorTable = ErrorTable::new(&[("SVC902", ErrorKind::SystemIUnavailable)]);

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UpdateConsentRequest {
    #[serde(rename = "IDCardNo")]
    pub id_card_no: String,
    /// Caller channel; validated but not sent to System I.
    pub channel: String,
    pub action_channel: String,
    pub action_date_time: String,
    pub application_no: String,
    pub application_version: String,
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    #[serde(rename = "ATMNo")]
    pub atm_no: String,
    pub branch_code: String,
    pub voice_path: String,
    pub total_of_consent_code: i64,
    pub consent_lists: Vec<ConsentItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConsentItem {
    pub consent_form: String,
    pub consent_code: String,
    pub consent_form_version: String,
    pub consent_language: String,
    pub consent_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateConsentResponse {
    /// `C` when System I accepted the update, `N` otherwise.
    #[serde(rename = "Status")]
    pub status: String,
}

/// Records customer consent decisions.
#[derive(Debug, Clone, Copy)]
pub struct UpdateConsent;

impl Operation for UpdateConsent {
    const NAME: &'static str = "UpdateConsent";
    const METHOD: &'static str = "POST";
    const PATH: &'static str = "/Api/Consent/UpdateConsent";

    type Request = UpdateConsentRequest;
    type Response = UpdateConsentResponse;

    fn encode(request: &Self::Request) -> String {
        let mut writer = CONSENT_REQUEST.writer();
        writer
            .text(&ID_CARD_NO, &request.id_card_no)
            .text(&ACTION_CHANNEL, &request.action_channel)
            .text(&ACTION_DATE_TIME, &request.action_date_time)
            .text(&APPLICATION_NO, &request.application_no)
            .text(&APPLICATION_VERSION, &request.application_version)
            .text(&IP_ADDRESS, &request.ip_address)
            .text(&ATM_NO, &request.atm_no)
            .text(&BRANCH_CODE, &request.branch_code)
            .text(&VOICE_PATH, &request.voice_path)
            .integer(&TOTAL_OF_CONSENT_CODE, request.total_of_consent_code);

        let mut body = writer.finish();
        for item in &request.consent_lists {
            let mut writer = CONSENT_ITEM.writer();
            writer
                .text(&CONSENT_FORM, &item.consent_form)
                .text(&CONSENT_CODE, &item.consent_code)
                .text(&CONSENT_FORM_VERSION, &item.consent_form_version)
                .text(&CONSENT_LANGUAGE, &item.consent_language)
                .text(&CONSENT_STATUS, &item.consent_status);
            body.push_str(&writer.finish());
        }
        body
    }

    fn decode(message: &[char]) -> Result<Self::Response, ProtocolError> {
        let body = split_body(message, CONSENT_RESPONSE.length)?;
        let status = RecordReader::new(body).text(&RS_STATUS);
        Ok(UpdateConsentResponse {
            status: if status == "00" { "C" } else { "N" }.to_string(),
        })
    }

    fn error_table() -> &'static ErrorTable {
        &CONSENT_ERRORS
    }

    fn missing_fields(request: &Self::Request) -> Vec<String> {
        let mut missing = Vec::new();
        require(&mut missing, "IDCardNo", &request.id_card_no);
        require(&mut missing, "Channel", &request.channel);
        require(&mut missing, "ActionChannel", &request.action_channel);
        require(&mut missing, "ActionDateTime", &request.action_date_time);
        require(&mut missing, "IPAddress", &request.ip_address);
        if request.total_of_consent_code <= 0 {
            missing.push("TotalOfConsentCode".to_string());
        }
        missing
    }

    fn oversized_fields(request: &Self::Request) -> Vec<String> {
        let mut oversized = Vec::new();
        limit_to(&mut oversized, &ID_CARD_NO, &request.id_card_no);
        limit(&mut oversized, "Channel", &request.channel, MAX_CHANNEL_LENGTH);
        limit_to(&mut oversized, &ACTION_CHANNEL, &request.action_channel);
        limit_to(&mut oversized, &ACTION_DATE_TIME, &request.action_date_time);
        limit_to(&mut oversized, &APPLICATION_NO, &request.application_no);
        limit_to(&mut oversized, &APPLICATION_VERSION, &request.application_version);
        limit_to(&mut oversized, &IP_ADDRESS, &request.ip_address);
        limit_to(&mut oversized, &ATM_NO, &request.atm_no);
        limit_to(&mut oversized, &BRANCH_CODE, &request.branch_code);
        limit_to(&mut oversized, &VOICE_PATH, &request.voice_path);
        limit(
            &mut oversized,
            TOTAL_OF_CONSENT_CODE.name,
            &request.total_of_consent_code.to_string(),
            TOTAL_OF_CONSENT_CODE.length,
        );

        let item_fields = [&CONSENT_FORM, &CONSENT_CODE, &CONSENT_FORM_VERSION, &CONSENT_LANGUAGE, &CONSENT_STATUS];
        for (i, item) in request.consent_lists.iter().enumerate() {
            let values = [
                &item.consent_form,
                &item.consent_code,
                &item.consent_form_version,
                &item.consent_language,
                &item.consent_status,
            ];
            for (field, value) in item_fields.iter().zip(values) {
                limit(&mut oversized, format!("ConsentLists[{}].{}", i, field.name), value, field.length);
            }
        }
        oversized
    }
}
