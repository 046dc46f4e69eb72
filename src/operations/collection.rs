//! Collection department operations: case detail lookup and call logging.
//!
//! ```text
//! CollectionDetail response body
//!     0   20  IDCardNo
//!    20    2  NoOfAgreement
//!    22  942  agreement block × NoOfAgreement
//!
//! CollectionLog request body:   653-char block per agreement
//! CollectionLog response body
//!     0   20  IDCardNo
//!    20   18  agreement status block × (remaining / 18)
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::codec::{split_body, BlockCount, Field, Layout, ProtocolError, RecordReader, RepeatingGroup};
use crate::error::{ErrorKind, ErrorTable};
use crate::operations::{require, string_or_number, Operation};

// ---------------------------------------------------------------------------
// CollectionDetail
// ---------------------------------------------------------------------------

const RQ_ID_CARD_NO: Field = Field::text("IDCardNo", 0, 20);
const RQ_RED_CASE_NO: Field = Field::text("RedCaseNo", 20, 15);
const RQ_BLACK_CASE_NO: Field = Field::text("BlackCaseNo", 35, 15);

static DETAIL_REQUEST: Layout = Layout {
    name: "CollectionDetailRequest",
    length: 50,
    fields: &[RQ_ID_CARD_NO, RQ_RED_CASE_NO, RQ_BLACK_CASE_NO],
};

const ID_CARD_NO: Field = Field::text("IDCardNo", 0, 20);
const NO_OF_AGREEMENT: Field = Field::integer("NoOfAgreement", 20, 2);

const AGREEMENT_NO: Field = Field::text("AgreementNo", 0, 16);
const SEQ_OF_AGREEMENT: Field = Field::integer("SeqOfAgreement", 16, 2);
const OUTSOURCE_ID: Field = Field::text("OutsourceID", 18, 4);
const OUTSOURCE_NAME: Field = Field::text("OutsourceName", 22, 30);
const BLOCK_CODE: Field = Field::text("BlockCode", 52, 2);
const CUR_PRINCIPAL_NET: Field = Field::decimal("CurrentSUEOSPrincipalNet", 54, 10, 2);
const CUR_PRINCIPAL_VAT: Field = Field::decimal("CurrentSUEOSPrincipalVAT", 64, 10, 2);
const CUR_INTEREST_NET: Field = Field::decimal("CurrentSUEOSInterestNet", 74, 10, 2);
const CUR_INTEREST_VAT: Field = Field::decimal("CurrentSUEOSInterestVAT", 84, 10, 2);
const CUR_PENALTY: Field = Field::decimal("CurrentSUEOSPenalty", 94, 9, 2);
const CUR_HD_CHARGE: Field = Field::decimal("CurrentSUEOSHDCharge", 103, 9, 2);
const CUR_OTHER_FEE: Field = Field::decimal("CurrentSUEOSOtherFee", 112, 9, 2);
const CUR_TOTAL: Field = Field::decimal("CurrentSUEOSTotal", 121, 10, 2);
const TOTAL_PAYMENT_AMOUNT: Field = Field::decimal("TotalPaymentAmount", 131, 10, 2);
const LAST_PAYMENT_DATE: Field = Field::integer("LastPaymentDate", 141, 8);
const SUE_SEQ_NO: Field = Field::integer("SUESeqNo", 149, 2);
const BEGIN_PRINCIPAL_NET: Field = Field::decimal("BeginSUEOSPrincipalNet", 151, 10, 2);
const BEGIN_PRINCIPAL_VAT: Field = Field::decimal("BeginSUEOSPrincipalVAT", 161, 10, 2);
const BEGIN_INTEREST_NET: Field = Field::decimal("BeginSUEOSInterestNet", 171, 10, 2);
const BEGIN_INTEREST_VAT: Field = Field::decimal("BeginSUEOSInterestVAT", 181, 10, 2);
const BEGIN_PENALTY: Field = Field::decimal("BeginSUEOSPenalty", 191, 10, 2);
const BEGIN_HD_CHARGE: Field = Field::decimal("BeginSUEOSHDCharge", 201, 9, 2);
const BEGIN_OTHER_FEE: Field = Field::decimal("BeginSUEOSOtherFee", 210, 9, 2);
const BEGIN_TOTAL: Field = Field::decimal("BeginSUEOSTotal", 219, 10, 2);
const SUE_STATUS: Field = Field::integer("SUEStatus", 229, 2);
const SUE_STATUS_DESCRIPTION: Field = Field::text("SUEStatusDescription", 231, 30);
const BLACK_CASE_NO: Field = Field::text("BlackCaseNo", 261, 15);
const BLACK_CASE_DATE: Field = Field::integer("BlackCaseDate", 276, 8);
const RED_CASE_NO: Field = Field::text("RedCaseNo", 284, 15);
const RED_CASE_DATE: Field = Field::integer("RedCaseDate", 299, 8);
const COURT_CODE: Field = Field::text("CourtCode", 307, 4);
const COURT_NAME: Field = Field::text("CourtName", 311, 30);
const JUDGMENT_DATE: Field = Field::integer("JudgmentDate", 341, 8);
const JUDGMENT_RESULT_CODE: Field = Field::integer("JudgmentResultCode", 349, 1);
const JUDGMENT_RESULT_DESCRIPTION: Field = Field::text("JudgmentResultDescription", 350, 40);
const JUDGMENT_DETAIL: Field = Field::text("JudgmentDetail", 390, 500);
const EXPECT_DATE: Field = Field::integer("ExpectDate", 890, 8);
const ASSET_PRICE: Field = Field::decimal("AssetPrice", 898, 10, 2);
const JUDGE_AMOUNT: Field = Field::decimal("JudgeAmount", 908, 10, 2);
const NO_OF_INSTALLMENT: Field = Field::text("NoOfInstallment", 918, 3);
const INSTALLMENT_AMOUNT: Field = Field::decimal("InstallmentAmount", 921, 10, 2);
const TOTAL_CURRENT_PER_SUE_SEQ_NO: Field = Field::decimal("TotalCurrentPerSUESeqNo", 931, 11, 2);

static AGREEMENT: Layout = Layout {
    name: "CollectionDetailAgreement",
    length: 942,
    fields: &[
        AGREEMENT_NO,
        SEQ_OF_AGREEMENT,
        OUTSOURCE_ID,
        OUTSOURCE_NAME,
        BLOCK_CODE,
        CUR_PRINCIPAL_NET,
        CUR_PRINCIPAL_VAT,
        CUR_INTEREST_NET,
        CUR_INTEREST_VAT,
        CUR_PENALTY,
        CUR_HD_CHARGE,
        CUR_OTHER_FEE,
        CUR_TOTAL,
        TOTAL_PAYMENT_AMOUNT,
        LAST_PAYMENT_DATE,
        SUE_SEQ_NO,
        BEGIN_PRINCIPAL_NET,
        BEGIN_PRINCIPAL_VAT,
        BEGIN_INTEREST_NET,
        BEGIN_INTEREST_VAT,
        BEGIN_PENALTY,
        BEGIN_HD_CHARGE,
        BEGIN_OTHER_FEE,
        BEGIN_TOTAL,
        SUE_STATUS,
        SUE_STATUS_DESCRIPTION,
        BLACK_CASE_NO,
        BLACK_CASE_DATE,
        RED_CASE_NO,
        RED_CASE_DATE,
        COURT_CODE,
        COURT_NAME,
        JUDGMENT_DATE,
        JUDGMENT_RESULT_CODE,
        JUDGMENT_RESULT_DESCRIPTION,
        JUDGMENT_DETAIL,
        EXPECT_DATE,
        ASSET_PRICE,
        JUDGE_AMOUNT,
        NO_OF_INSTALLMENT,
        INSTALLMENT_AMOUNT,
        TOTAL_CURRENT_PER_SUE_SEQ_NO,
    ],
};

static AGREEMENTS: RepeatingGroup = RepeatingGroup {
    start: 22,
    count: BlockCount::Declared(NO_OF_AGREEMENT),
    layout: &AGREEMENT,
};

static DETAIL_ERRORS: ErrorTable = ErrorTable::new(&[
    ("SVC105", ErrorKind::RequiredParameter),
    ("SVC117", ErrorKind::IdCardNotFound),
    ("SVC203", ErrorKind::SueInfoNotFound),
    ("SVC902", ErrorKind::SystemIUnavailable),
]);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionDetailRequest {
    #[serde(rename = "IDCardNo", default)]
    pub id_card_no: String,
    #[serde(rename = "RedCaseNo", default)]
    pub red_case_no: String,
    #[serde(rename = "BlackCaseNo", default)]
    pub black_case_no: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionDetailResponse {
    #[serde(rename = "IDCardNo")]
    pub id_card_no: String,
    #[serde(rename = "NoOfAgreement")]
    pub no_of_agreement: i64,
    #[serde(rename = "AgreementList")]
    pub agreements: Vec<CollectionDetailAgreement>,
}

/// One sued agreement. Amounts carry two implied decimals on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CollectionDetailAgreement {
    pub agreement_no: String,
    pub seq_of_agreement: i64,
    #[serde(rename = "OutsourceID")]
    pub outsource_id: String,
    pub outsource_name: String,
    pub block_code: String,
    #[serde(rename = "CurrentSUEOSPrincipalNet")]
    pub current_sueos_principal_net: Decimal,
    #[serde(rename = "CurrentSUEOSPrincipalVAT")]
    pub current_sueos_principal_vat: Decimal,
    #[serde(rename = "CurrentSUEOSInterestNet")]
    pub current_sueos_interest_net: Decimal,
    #[serde(rename = "CurrentSUEOSInterestVAT")]
    pub current_sueos_interest_vat: Decimal,
    #[serde(rename = "CurrentSUEOSPenalty")]
    pub current_sueos_penalty: Decimal,
    #[serde(rename = "CurrentSUEOSHDCharge")]
    pub current_sueos_hd_charge: Decimal,
    #[serde(rename = "CurrentSUEOSOtherFee")]
    pub current_sueos_other_fee: Decimal,
    #[serde(rename = "CurrentSUEOSTotal")]
    pub current_sueos_total: Decimal,
    pub total_payment_amount: Decimal,
    pub last_payment_date: i64,
    #[serde(rename = "SUESeqNo")]
    pub sue_seq_no: i64,
    #[serde(rename = "BeginSUEOSPrincipalNet")]
    pub begin_sueos_principal_net: Decimal,
    #[serde(rename = "BeginSUEOSPrincipalVAT")]
    pub begin_sueos_principal_vat: Decimal,
    #[serde(rename = "BeginSUEOSInterestNet")]
    pub begin_sueos_interest_net: Decimal,
    #[serde(rename = "BeginSUEOSInterestVAT")]
    pub begin_sueos_interest_vat: Decimal,
    #[serde(rename = "BeginSUEOSPenalty")]
    pub begin_sueos_penalty: Decimal,
    #[serde(rename = "BeginSUEOSHDCharge")]
    pub begin_sueos_hd_charge: Decimal,
    #[serde(rename = "BeginSUEOSOtherFee")]
    pub begin_sueos_other_fee: Decimal,
    #[serde(rename = "BeginSUEOSTotal")]
    pub begin_sueos_total: Decimal,
    #[serde(rename = "SUEStatus")]
    pub sue_status: i64,
    #[serde(rename = "SUEStatusDescription")]
    pub sue_status_description: String,
    pub black_case_no: String,
    pub black_case_date: i64,
    pub red_case_no: String,
    pub red_case_date: i64,
    pub court_code: String,
    pub court_name: String,
    pub judgment_date: i64,
    pub judgment_result_code: i64,
    pub judgment_result_description: String,
    pub judgment_detail: String,
    pub expect_date: i64,
    pub asset_price: Decimal,
    pub judge_amount: Decimal,
    pub no_of_installment: String,
    pub installment_amount: Decimal,
    #[serde(rename = "TotalCurrentPerSUESeqNo")]
    pub total_current_per_sue_seq_no: Decimal,
}

impl CollectionDetailAgreement {
    fn read(block: &RecordReader<'_>) -> Self {
        Self {
            agreement_no: block.text(&AGREEMENT_NO),
            seq_of_agreement: block.integer(&SEQ_OF_AGREEMENT),
            outsource_id: block.text(&OUTSOURCE_ID),
            outsource_name: block.text(&OUTSOURCE_NAME),
            block_code: block.text(&BLOCK_CODE),
            current_sueos_principal_net: block.decimal(&CUR_PRINCIPAL_NET),
            current_sueos_principal_vat: block.decimal(&CUR_PRINCIPAL_VAT),
            current_sueos_interest_net: block.decimal(&CUR_INTEREST_NET),
            current_sueos_interest_vat: block.decimal(&CUR_INTEREST_VAT),
            current_sueos_penalty: block.decimal(&CUR_PENALTY),
            current_sueos_hd_charge: block.decimal(&CUR_HD_CHARGE),
            current_sueos_other_fee: block.decimal(&CUR_OTHER_FEE),
            current_sueos_total: block.decimal(&CUR_TOTAL),
            total_payment_amount: block.decimal(&TOTAL_PAYMENT_AMOUNT),
            last_payment_date: block.integer(&LAST_PAYMENT_DATE),
            sue_seq_no: block.integer(&SUE_SEQ_NO),
            begin_sueos_principal_net: block.decimal(&BEGIN_PRINCIPAL_NET),
            begin_sueos_principal_vat: block.decimal(&BEGIN_PRINCIPAL_VAT),
            begin_sueos_interest_net: block.decimal(&BEGIN_INTEREST_NET),
            begin_sueos_interest_vat: block.decimal(&BEGIN_INTEREST_VAT),
            begin_sueos_penalty: block.decimal(&BEGIN_PENALTY),
            begin_sueos_hd_charge: block.decimal(&BEGIN_HD_CHARGE),
            begin_sueos_other_fee: block.decimal(&BEGIN_OTHER_FEE),
            begin_sueos_total: block.decimal(&BEGIN_TOTAL),
            sue_status: block.integer(&SUE_STATUS),
            sue_status_description: block.text(&SUE_STATUS_DESCRIPTION),
            black_case_no: block.text(&BLACK_CASE_NO),
            black_case_date: block.integer(&BLACK_CASE_DATE),
            red_case_no: block.text(&RED_CASE_NO),
            red_case_date: block.integer(&RED_CASE_DATE),
            court_code: block.text(&COURT_CODE),
            court_name: block.text(&COURT_NAME),
            judgment_date: block.integer(&JUDGMENT_DATE),
            judgment_result_code: block.integer(&JUDGMENT_RESULT_CODE),
            judgment_result_description: block.text(&JUDGMENT_RESULT_DESCRIPTION),
            judgment_detail: block.text(&JUDGMENT_DETAIL),
            expect_date: block.integer(&EXPECT_DATE),
            asset_price: block.decimal(&ASSET_PRICE),
            judge_amount: block.decimal(&JUDGE_AMOUNT),
            no_of_installment: block.text(&NO_OF_INSTALLMENT),
            installment_amount: block.decimal(&INSTALLMENT_AMOUNT),
            total_current_per_sue_seq_no: block.decimal(&TOTAL_CURRENT_PER_SUE_SEQ_NO),
        }
    }
}

/// Sued-agreement details for one ID card.
#[derive(Debug, Clone, Copy)]
pub struct CollectionDetail;

impl Operation for CollectionDetail {
    const NAME: &'static str = "CollectionDetail";
    const METHOD: &'static str = "POST";
    const PATH: &'static str = "/Api/Collection/CollectionDetail";

    type Request = CollectionDetailRequest;
    type Response = CollectionDetailResponse;

    fn encode(request: &Self::Request) -> String {
        let mut writer = DETAIL_REQUEST.writer();
        writer
            .text(&RQ_ID_CARD_NO, &request.id_card_no)
            .text(&RQ_RED_CASE_NO, &request.red_case_no)
            .text(&RQ_BLACK_CASE_NO, &request.black_case_no);
        writer.finish()
    }

    fn decode(message: &[char]) -> Result<Self::Response, ProtocolError> {
        let body = split_body(message, NO_OF_AGREEMENT.end())?;
        let reader = RecordReader::new(body);
        let agreements = AGREEMENTS
            .blocks(body)
            .iter()
            .map(CollectionDetailAgreement::read)
            .collect();

        Ok(CollectionDetailResponse {
            id_card_no: reader.text(&ID_CARD_NO),
            no_of_agreement: reader.integer(&NO_OF_AGREEMENT),
            agreements,
        })
    }

    fn error_table() -> &'static ErrorTable {
        &DETAIL_ERRORS
    }

    fn missing_fields(request: &Self::Request) -> Vec<String> {
        let mut missing = Vec::new();
        require(&mut missing, "IDCardNo", &request.id_card_no);
        missing
    }
}

// ---------------------------------------------------------------------------
// CollectionLog
// ---------------------------------------------------------------------------

const LOG_AGREEMENT_NO: Field = Field::text("AgreementNo", 0, 16);
const LOG_REMARK_CODE: Field = Field::text("RemarkCode", 16, 4);
const LOG_REMARK_1: Field = Field::text("LogRemark1", 20, 120);
const LOG_REMARK_2: Field = Field::text("LogRemark2", 140, 120);
const LOG_REMARK_3: Field = Field::text("LogRemark3", 260, 120);
const LOG_REMARK_4: Field = Field::text("LogRemark4", 380, 120);
const LOG_REMARK_5: Field = Field::text("LogRemark5", 500, 120);
const LOG_INPUT_DATE: Field = Field::text("InputDate", 620, 12);
const LOG_INPUT_TIME: Field = Field::text("InputTime", 632, 6);
const LOG_OPERATOR_ID: Field = Field::text("OperatorID", 638, 15);

static LOG_ENTRY: Layout = Layout {
    name: "CollectionLogEntry",
    length: 653,
    fields: &[
        LOG_AGREEMENT_NO,
        LOG_REMARK_CODE,
        LOG_REMARK_1,
        LOG_REMARK_2,
        LOG_REMARK_3,
        LOG_REMARK_4,
        LOG_REMARK_5,
        LOG_INPUT_DATE,
        LOG_INPUT_TIME,
        LOG_OPERATOR_ID,
    ],
};

const LOG_ID_CARD_NO: Field = Field::text("IDCardNo", 0, 20);
const STATUS_AGREEMENT_NO: Field = Field::text("AgreementNo", 0, 16);
const STATUS_LOG_REMARK: Field = Field::text("LogRemarkStatus", 16, 2);

static LOG_STATUS: Layout = Layout {
    name: "CollectionLogStatus",
    length: 18,
    fields: &[STATUS_AGREEMENT_NO, STATUS_LOG_REMARK],
};

static LOG_STATUSES: RepeatingGroup = RepeatingGroup {
    start: 20,
    count: BlockCount::Remaining,
    layout: &LOG_STATUS,
};

static LOG_ERRORS: ErrorTable = ErrorTable::new(&[
    ("SVC216", ErrorKind::RequiredParameter),
    ("SVC235", ErrorKind::RequiredParameter),
    ("SVC342", ErrorKind::RequiredParameter),
    ("SVC343", ErrorKind::RequiredParameter),
    // System I really sends this misspelled code.
    ("SCV344", ErrorKind::RequiredParameter),
    ("SVC236", ErrorKind::AgreementNotFound),
    ("SVC902", ErrorKind::SystemIUnavailable),
]);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionLogRequest {
    #[serde(rename = "AgreementList", default)]
    pub agreements: Vec<CollectionLogEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CollectionLogEntry {
    #[serde(default, deserialize_with = "string_or_number")]
    pub agreement_no: String,
    #[serde(default)]
    pub remark_code: String,
    #[serde(default)]
    pub log_remark1: String,
    #[serde(default)]
    pub log_remark2: String,
    #[serde(default)]
    pub log_remark3: String,
    #[serde(default)]
    pub log_remark4: String,
    #[serde(default)]
    pub log_remark5: String,
    #[serde(default)]
    pub input_date: String,
    #[serde(default)]
    pub input_time: String,
    #[serde(rename = "OperatorID", default)]
    pub operator_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionLogResponse {
    #[serde(rename = "IDCardNo")]
    pub id_card_no: String,
    #[serde(rename = "AgreementList")]
    pub agreements: Vec<CollectionLogStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CollectionLogStatus {
    pub agreement_no: String,
    pub log_remark_status: String,
}

/// Records collector remarks against one or more agreements.
#[derive(Debug, Clone, Copy)]
pub struct CollectionLog;

impl Operation for CollectionLog {
    const NAME: &'static str = "CollectionLog";
    const METHOD: &'static str = "POST";
    const PATH: &'static str = "/Api/Collection/CollectionLog";

    type Request = CollectionLogRequest;
    type Response = CollectionLogResponse;

    fn encode(request: &Self::Request) -> String {
        let mut body = String::with_capacity(request.agreements.len() * LOG_ENTRY.length);
        for entry in &request.agreements {
            let mut writer = LOG_ENTRY.writer();
            writer
                .text(&LOG_AGREEMENT_NO, &entry.agreement_no)
                .text(&LOG_REMARK_CODE, &entry.remark_code)
                .text(&LOG_REMARK_1, &entry.log_remark1)
                .text(&LOG_REMARK_2, &entry.log_remark2)
                .text(&LOG_REMARK_3, &entry.log_remark3)
                .text(&LOG_REMARK_4, &entry.log_remark4)
                .text(&LOG_REMARK_5, &entry.log_remark5)
                .text(&LOG_INPUT_DATE, &entry.input_date)
                .text(&LOG_INPUT_TIME, &entry.input_time)
                .text(&LOG_OPERATOR_ID, &entry.operator_id);
            body.push_str(&writer.finish());
        }
        body
    }

    fn decode(message: &[char]) -> Result<Self::Response, ProtocolError> {
        let body = split_body(message, LOG_ID_CARD_NO.end())?;
        let agreements = LOG_STATUSES
            .blocks(body)
            .iter()
            .map(|row| CollectionLogStatus {
                agreement_no: row.text(&STATUS_AGREEMENT_NO),
                log_remark_status: row.text(&STATUS_LOG_REMARK),
            })
            .collect();

        Ok(CollectionLogResponse {
            id_card_no: RecordReader::new(body).text(&LOG_ID_CARD_NO),
            agreements,
        })
    }

    fn error_table() -> &'static ErrorTable {
        &LOG_ERRORS
    }

    fn missing_fields(request: &Self::Request) -> Vec<String> {
        let mut missing = Vec::new();
        if request.agreements.is_empty() {
            missing.push("AgreementList".to_string());
        }
        for (i, entry) in request.agreements.iter().enumerate() {
            require(&mut missing, format!("AgreementList[{}].AgreementNo", i), &entry.agreement_no);
            require(&mut missing, format!("AgreementList[{}].RemarkCode", i), &entry.remark_code);
            require(&mut missing, format!("AgreementList[{}].InputDate", i), &entry.input_date);
            require(&mut missing, format!("AgreementList[{}].InputTime", i), &entry.input_time);
            require(&mut missing, format!("AgreementList[{}].OperatorID", i), &entry.operator_id);
        }
        missing
    }
}
