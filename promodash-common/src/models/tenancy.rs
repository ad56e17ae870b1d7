// File: promodash-common/src/models/tenancy.rs
//
// Tenancy hierarchy: countries, dealers reselling in a country, clients
// signed by a dealer, branches operated by a client.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::traits::{Draft, Resource};
use crate::validation::{optional_text, parse_bool, parse_id, require, FieldErrors};

fn yes_no(v: bool) -> String {
    if v { "yes".to_string() } else { "no".to_string() }
}

fn or_dash(v: &Option<String>) -> String {
    v.clone().unwrap_or_else(|| "-".to_string())
}

fn active_flag(value: &str) -> Result<bool, String> {
    parse_bool(value).ok_or_else(|| format!("is_active must be true or false, got '{value}'"))
}

// ---------------------------------------------------------------- countries

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CountryDraft {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,
    pub code: String,
    #[validate(length(max = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,
    pub is_active: bool,
}

impl Default for CountryDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            code: String::new(),
            currency: None,
            is_active: true,
        }
    }
}

impl Draft for CountryDraft {
    fn set_field(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "name" => self.name = value.to_string(),
            "code" => self.code = value.trim().to_uppercase(),
            "currency" => self.currency = optional_text(value).map(|c| c.to_uppercase()),
            "is_active" => self.is_active = active_flag(value)?,
            other => return Err(format!("Unknown country field '{other}'")),
        }
        Ok(())
    }

    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Name is required");
        if self.code.len() != 2 || !self.code.chars().all(|c| c.is_ascii_alphabetic()) {
            errors.add("code", "Code must be a 2-letter ISO code");
        }
        if let Err(e) = self.validate() {
            errors.merge(FieldErrors::from_validator(&e));
        }
        errors.into_result()
    }

    fn field_names() -> &'static [&'static str] {
        &["name", "code", "currency", "is_active"]
    }
}

impl Resource for Country {
    const PATH: &'static str = "countries/";
    const LABEL: &'static str = "country";
    const PLURAL: &'static str = "countries";
    const DEPENDENTS: &'static [&'static str] = &["dealers/"];

    type Draft = CountryDraft;

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn to_draft(&self) -> CountryDraft {
        CountryDraft {
            name: self.name.clone(),
            code: self.code.clone(),
            currency: self.currency.clone(),
            is_active: self.is_active,
        }
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Code", "Currency", "Active"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.code.clone(),
            or_dash(&self.currency),
            yes_no(self.is_active),
        ]
    }
}

// ------------------------------------------------------------------ dealers

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dealer {
    pub id: i64,
    pub name: String,
    pub country: i64,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DealerDraft {
    #[validate(length(max = 150, message = "Name must be at most 150 characters"))]
    pub name: String,
    pub country: Option<i64>,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    pub is_active: bool,
}

impl Default for DealerDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            country: None,
            email: None,
            phone: None,
            is_active: true,
        }
    }
}

impl Draft for DealerDraft {
    fn set_field(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "name" => self.name = value.to_string(),
            "country" => self.country = Some(parse_id("country", value)?),
            "email" => self.email = optional_text(value),
            "phone" => self.phone = optional_text(value),
            "is_active" => self.is_active = active_flag(value)?,
            other => return Err(format!("Unknown dealer field '{other}'")),
        }
        Ok(())
    }

    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Name is required");
        if self.country.is_none() {
            errors.add("country", "Country is required");
        }
        if let Err(e) = self.validate() {
            errors.merge(FieldErrors::from_validator(&e));
        }
        errors.into_result()
    }

    fn field_names() -> &'static [&'static str] {
        &["name", "country", "email", "phone", "is_active"]
    }
}

impl Resource for Dealer {
    const PATH: &'static str = "dealers/";
    const LABEL: &'static str = "dealer";
    const PLURAL: &'static str = "dealers";
    const DEPENDENTS: &'static [&'static str] = &["clients/"];

    type Draft = DealerDraft;

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn to_draft(&self) -> DealerDraft {
        DealerDraft {
            name: self.name.clone(),
            country: Some(self.country),
            email: self.email.clone(),
            phone: self.phone.clone(),
            is_active: self.is_active,
        }
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Country", "Email", "Phone", "Active"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.country_name.clone().unwrap_or_else(|| self.country.to_string()),
            or_dash(&self.email),
            or_dash(&self.phone),
            yes_no(self.is_active),
        ]
    }
}

// ------------------------------------------------------------------ clients

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub dealer: Option<i64>,
    #[serde(default)]
    pub dealer_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ClientDraft {
    #[validate(length(max = 150, message = "Name must be at most 150 characters"))]
    pub name: String,
    pub dealer: Option<i64>,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    pub is_active: bool,
}

impl Default for ClientDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            dealer: None,
            email: None,
            phone: None,
            is_active: true,
        }
    }
}

impl Draft for ClientDraft {
    fn set_field(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "name" => self.name = value.to_string(),
            "dealer" => self.dealer = Some(parse_id("dealer", value)?),
            "email" => self.email = optional_text(value),
            "phone" => self.phone = optional_text(value),
            "is_active" => self.is_active = active_flag(value)?,
            other => return Err(format!("Unknown client field '{other}'")),
        }
        Ok(())
    }

    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Name is required");
        if self.dealer.is_none() {
            errors.add("dealer", "Dealer is required");
        }
        if let Err(e) = self.validate() {
            errors.merge(FieldErrors::from_validator(&e));
        }
        errors.into_result()
    }

    fn field_names() -> &'static [&'static str] {
        &["name", "dealer", "email", "phone", "is_active"]
    }
}

impl Resource for Client {
    const PATH: &'static str = "clients/";
    const LABEL: &'static str = "client";
    const PLURAL: &'static str = "clients";
    const DEPENDENTS: &'static [&'static str] = &["branches/", "campaigns/"];

    type Draft = ClientDraft;

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn to_draft(&self) -> ClientDraft {
        ClientDraft {
            name: self.name.clone(),
            dealer: self.dealer,
            email: self.email.clone(),
            phone: self.phone.clone(),
            is_active: self.is_active,
        }
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Dealer", "Email", "Phone", "Active"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.dealer_name
                .clone()
                .or_else(|| self.dealer.map(|d| d.to_string()))
                .unwrap_or_else(|| "-".to_string()),
            or_dash(&self.email),
            or_dash(&self.phone),
            yes_no(self.is_active),
        ]
    }
}

// ----------------------------------------------------------------- branches

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: i64,
    pub name: String,
    pub client: i64,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BranchDraft {
    #[validate(length(max = 150, message = "Name must be at most 150 characters"))]
    pub name: String,
    pub client: Option<i64>,
    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    pub is_active: bool,
}

impl Default for BranchDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            client: None,
            address: None,
            phone: None,
            is_active: true,
        }
    }
}

impl Draft for BranchDraft {
    fn set_field(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "name" => self.name = value.to_string(),
            "client" => self.client = Some(parse_id("client", value)?),
            "address" => self.address = optional_text(value),
            "phone" => self.phone = optional_text(value),
            "is_active" => self.is_active = active_flag(value)?,
            other => return Err(format!("Unknown branch field '{other}'")),
        }
        Ok(())
    }

    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Name is required");
        if self.client.is_none() {
            errors.add("client", "Client is required");
        }
        if let Err(e) = self.validate() {
            errors.merge(FieldErrors::from_validator(&e));
        }
        errors.into_result()
    }

    fn field_names() -> &'static [&'static str] {
        &["name", "client", "address", "phone", "is_active"]
    }
}

impl Resource for Branch {
    const PATH: &'static str = "branches/";
    const LABEL: &'static str = "branch";
    const PLURAL: &'static str = "branches";

    type Draft = BranchDraft;

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn to_draft(&self) -> BranchDraft {
        BranchDraft {
            name: self.name.clone(),
            client: Some(self.client),
            address: self.address.clone(),
            phone: self.phone.clone(),
            is_active: self.is_active,
        }
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Client", "Address", "Phone", "Active"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.client_name.clone().unwrap_or_else(|| self.client.to_string()),
            or_dash(&self.address),
            or_dash(&self.phone),
            yes_no(self.is_active),
        ]
    }
}

pub(crate) fn default_true() -> bool {
    true
}
