//! Self-service card listings.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::codec::{split_body, BlockCount, Field, Layout, ProtocolError, RecordReader, RepeatingGroup};
use crate::error::{ErrorKind, ErrorTable};
use crate::operations::{mask_card_number, require, Operation};

static SELF_SERVICE_ERRORS: ErrorTable = ErrorTable::new(&[("SVC902", ErrorKind::SystemIUnavailable)]);

/// Both listings are keyed by the customer's ID card number.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MyCardRequest {
    #[serde(rename = "UserRef", default)]
    pub user_ref: String,
}

fn require_user_ref(request: &MyCardRequest) -> Vec<String> {
    let mut missing = Vec::new();
    require(&mut missing, "UserRef", &request.user_ref);
    missing
}

// ---------------------------------------------------------------------------
// MyCard
// ---------------------------------------------------------------------------

const RQ_ID_CARD_NO: Field = Field::text("IDCardNo", 0, 20);
const RQ_CREDIT_CARD_NO: Field = Field::text("CreditCardNo", 20, 16);
const RQ_BUSINESS_CODE: Field = Field::text("BusinessCode", 36, 2);

static CARD_REQUEST: Layout = Layout {
    name: "MyCardRequest",
    length: 38,
    fields: &[RQ_ID_CARD_NO, RQ_CREDIT_CARD_NO, RQ_BUSINESS_CODE],
};

const ID_CARD_NO: Field = Field::text("IDCardNo", 0, 20);
const TOTAL_CREDIT_CARD: Field = Field::integer("TotalCreditCard", 20, 4);

const CREDIT_CARD_NO: Field = Field::text("CreditCardNo", 0, 16);
const CARD_NAME: Field = Field::text("CardName", 16, 30);
const PRODUCT_TYPE: Field = Field::text("ProductType", 46, 2);
const BUSINESS_CODE: Field = Field::text("BusinessCode", 48, 2);
const CARD_STATUS: Field = Field::text("CardStatus", 50, 2);
const EXPIRE_DATE: Field = Field::text("ExpireDate", 52, 8);
const DIGITAL_CARD_FLAG: Field = Field::text("DigitalCardFlag", 60, 1);

static CARD: Layout = Layout {
    name: "MyCardEntry",
    length: 61,
    fields: &[
        CREDIT_CARD_NO,
        CARD_NAME,
        PRODUCT_TYPE,
        BUSINESS_CODE,
        CARD_STATUS,
        EXPIRE_DATE,
        DIGITAL_CARD_FLAG,
    ],
};

static CARDS: RepeatingGroup = RepeatingGroup {
    start: 24,
    count: BlockCount::Declared(TOTAL_CREDIT_CARD),
    layout: &CARD,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MyCardResponse {
    #[serde(rename = "IDCardNo")]
    pub id_card_no: String,
    #[serde(rename = "TotalCreditCard")]
    pub total_credit_card: i64,
    #[serde(rename = "CardList")]
    pub cards: Vec<CardSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CardSummary {
    /// Masked unless the backend sent something other than 16 digits.
    pub credit_card_no: String,
    pub card_name: String,
    pub product_type: String,
    pub business_code: String,
    /// ACT, EXP or HLD.
    pub card_status: String,
    pub expire_date: String,
    pub digital_card_flag: String,
}

fn as_yyyymmdd(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 10_000 + i64::from(date.month()) * 100 + i64::from(date.day())
}

/// `00`/`II` are active; anything else is expired once past its date, held before.
fn card_status(raw_status: &str, expire_date: &str, today: NaiveDate) -> &'static str {
    if raw_status == "00" || raw_status == "II" {
        return "ACT";
    }
    let expires: i64 = expire_date.trim().parse().unwrap_or(0);
    if expires < as_yyyymmdd(today) {
        "EXP"
    } else {
        "HLD"
    }
}

impl CardSummary {
    fn read(block: &RecordReader<'_>, today: NaiveDate) -> Self {
        let expire_date = block.text(&EXPIRE_DATE);
        let raw_status = block.text(&CARD_STATUS);
        let flag = block.text(&DIGITAL_CARD_FLAG);
        Self {
            credit_card_no: mask_card_number(block.text(&CREDIT_CARD_NO).trim()),
            card_name: block.text(&CARD_NAME),
            product_type: block.text(&PRODUCT_TYPE),
            business_code: block.text(&BUSINESS_CODE),
            card_status: card_status(raw_status.trim(), &expire_date, today).to_string(),
            expire_date,
            digital_card_flag: if flag.trim().is_empty() { "N".to_string() } else { flag },
        }
    }
}

/// Cards held by one customer, with derived status.
#[derive(Debug, Clone, Copy)]
pub struct MyCard;

impl MyCard {
    /// Decode with card expiry judged against `today`.
    pub fn decode_on(message: &[char], today: NaiveDate) -> Result<MyCardResponse, ProtocolError> {
        let body = split_body(message, TOTAL_CREDIT_CARD.end())?;
        let reader = RecordReader::new(body);
        let cards = CARDS.blocks(body).iter().map(|block| CardSummary::read(block, today)).collect();

        Ok(MyCardResponse {
            id_card_no: reader.text(&ID_CARD_NO),
            total_credit_card: reader.integer(&TOTAL_CREDIT_CARD),
            cards,
        })
    }
}

impl Operation for MyCard {
    const NAME: &'static str = "MyCard";
    const METHOD: &'static str = "POST";
    const PATH: &'static str = "/Api/SelfService/MyCard";

    type Request = MyCardRequest;
    type Response = MyCardResponse;

    fn encode(request: &Self::Request) -> String {
        let mut writer = CARD_REQUEST.writer();
        writer.text(&RQ_ID_CARD_NO, &request.user_ref);
        writer.finish()
    }

    fn decode(message: &[char]) -> Result<Self::Response, ProtocolError> {
        Self::decode_on(message, Local::now().date_naive())
    }

    fn error_table() -> &'static ErrorTable {
        &SELF_SERVICE_ERRORS
    }

    fn missing_fields(request: &Self::Request) -> Vec<String> {
        require_user_ref(request)
    }
}

// ---------------------------------------------------------------------------
// MyCardAll
// ---------------------------------------------------------------------------

const ALL_RQ_ID_CARD_NO: Field = Field::text("IDCardNo", 0, 20);
const ALL_RQ_NAME_EN: Field = Field::text("CustomerNameEN", 20, 1);
const ALL_RQ_NAME_TH: Field = Field::text("CustomerNameTH", 21, 1);

static ALL_REQUEST: Layout = Layout {
    name: "MyCardAllRequest",
    length: 22,
    fields: &[ALL_RQ_ID_CARD_NO, ALL_RQ_NAME_EN, ALL_RQ_NAME_TH],
};

const ALL_ID_CARD_NO: Field = Field::text("IDCardNo", 0, 20);
const CUSTOMER_NAME_EN: Field = Field::text("CustomerNameEN", 20, 30);
const CUSTOMER_NAME_TH: Field = Field::text("CustomerNameTH", 50, 30);
const ALL_TOTAL_CREDIT_CARD: Field = Field::integer("TotalCreditCard", 80, 3);

const ALL_CREDIT_CARD_NO: Field = Field::text("CreditCardNo", 0, 16);
const CARD_CODE: Field = Field::text("CardCode", 16, 2);
const ALL_PRODUCT_TYPE: Field = Field::text("ProductType", 18, 2);
const CARD_TYPE: Field = Field::text("CardType", 20, 1);
const ALL_CARD_STATUS: Field = Field::text("CardStatus", 21, 1);
const ALL_EXPIRE_DATE: Field = Field::integer("ExpireDate", 22, 8);
const HOLD_CODE: Field = Field::text("HoldCode", 30, 2);
const RETREAT_CODE: Field = Field::text("RetreatCode", 32, 1);
const SEND_MODE: Field = Field::text("SendMode", 33, 1);
const FIRST_EMBOSS_DATE: Field = Field::integer("FirstEmbossDate", 34, 8);
const FIRST_CONFIRM_DATE: Field = Field::integer("FirstConfirmDate", 42, 8);
const SHOPPING_LIMIT: Field = Field::integer("ShoppingLimit", 50, 9);
const CASHING_LIMIT: Field = Field::integer("CashingLimit", 59, 9);

static ALL_CARD: Layout = Layout {
    name: "MyCardAllEntry",
    length: 68,
    fields: &[
        ALL_CREDIT_CARD_NO,
        CARD_CODE,
        ALL_PRODUCT_TYPE,
        CARD_TYPE,
        ALL_CARD_STATUS,
        ALL_EXPIRE_DATE,
        HOLD_CODE,
        RETREAT_CODE,
        SEND_MODE,
        FIRST_EMBOSS_DATE,
        FIRST_CONFIRM_DATE,
        SHOPPING_LIMIT,
        CASHING_LIMIT,
    ],
};

static ALL_CARDS: RepeatingGroup = RepeatingGroup {
    start: 83,
    count: BlockCount::Declared(ALL_TOTAL_CREDIT_CARD),
    layout: &ALL_CARD,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MyCardAllResponse {
    #[serde(rename = "IDCardNo")]
    pub id_card_no: String,
    #[serde(rename = "CustomerNameEN")]
    pub customer_name_en: String,
    #[serde(rename = "CustomerNameTH")]
    pub customer_name_th: String,
    #[serde(rename = "TotalCreditCard")]
    pub total_credit_card: i64,
    #[serde(rename = "CardList")]
    pub cards: Vec<CardDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CardDetail {
    pub credit_card_no: String,
    pub card_code: String,
    pub product_type: String,
    pub card_type: String,
    pub card_status: String,
    pub expire_date: i64,
    pub hold_code: String,
    pub retreat_code: String,
    pub send_mode: String,
    pub first_emboss_date: i64,
    pub first_confirm_date: i64,
    pub shopping_limit: i64,
    pub cashing_limit: i64,
}

/// Every card on file, including closed ones, with raw status codes.
#[derive(Debug, Clone, Copy)]
pub struct MyCardAll;

impl Operation for MyCardAll {
    const NAME: &'static str = "MyCardAll";
    const METHOD: &'static str = "POST";
    const PATH: &'static str = "/Api/SelfService/MyCardAll";

    type Request = MyCardRequest;
    type Response = MyCardAllResponse;

    fn encode(request: &Self::Request) -> String {
        let mut writer = ALL_REQUEST.writer();
        writer
            .text(&ALL_RQ_ID_CARD_NO, &request.user_ref)
            .text(&ALL_RQ_NAME_EN, "Y")
            .text(&ALL_RQ_NAME_TH, "Y");
        writer.finish()
    }

    fn decode(message: &[char]) -> Result<Self::Response, ProtocolError> {
        let body = split_body(message, ALL_TOTAL_CREDIT_CARD.end())?;
        let reader = RecordReader::new(body);
        let cards = ALL_CARDS
            .blocks(body)
            .iter()
            .map(|block| CardDetail {
                credit_card_no: mask_card_number(block.text(&ALL_CREDIT_CARD_NO).trim()),
                card_code: block.text(&CARD_CODE),
                product_type: block.text(&ALL_PRODUCT_TYPE),
                card_type: block.text(&CARD_TYPE),
                card_status: block.text(&ALL_CARD_STATUS),
                expire_date: block.integer(&ALL_EXPIRE_DATE),
                hold_code: block.text(&HOLD_CODE),
                retreat_code: block.text(&RETREAT_CODE),
                send_mode: block.text(&SEND_MODE),
                first_emboss_date: block.integer(&FIRST_EMBOSS_DATE),
                first_confirm_date: block.integer(&FIRST_CONFIRM_DATE),
                shopping_limit: block.integer(&SHOPPING_LIMIT),
                cashing_limit: block.integer(&CASHING_LIMIT),
            })
            .collect();

        Ok(MyCardAllResponse {
            id_card_no: reader.text(&ALL_ID_CARD_NO),
            customer_name_en: reader.text(&CUSTOMER_NAME_EN),
            customer_name_th: reader.text(&CUSTOMER_NAME_TH),
            total_credit_card: reader.integer(&ALL_TOTAL_CREDIT_CARD),
            cards,
        })
    }

    fn error_table() -> &'static ErrorTable {
        &SELF_SERVICE_ERRORS
    }

    fn missing_fields(request: &Self::Request) -> Vec<String> {
        require_user_ref(request)
    }
}
