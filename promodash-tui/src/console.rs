// Per-session console state: one list per resource screen plus the open
// campaign form, if any.

use promodash_common::models::{
    Branch, Campaign, Client, Country, Dealer, MarketingCampaign, MarketingGroup, MarketingUser,
};
use promodash_common_ui::commands::campaign::CampaignFormController;
use promodash_common_ui::commands::resource::CrudList;
use promodash_common_ui::{AppState, Toast};

const TOAST_LOG_SIZE: usize = 20;

pub struct ConsoleModule {
    pub state: AppState,
    pub countries: CrudList<Country>,
    pub dealers: CrudList<Dealer>,
    pub clients: CrudList<Client>,
    pub branches: CrudList<Branch>,
    pub campaigns: CrudList<Campaign>,
    pub marketing_users: CrudList<MarketingUser>,
    pub marketing_groups: CrudList<MarketingGroup>,
    pub marketing_campaigns: CrudList<MarketingCampaign>,
    pub campaign_form: Option<CampaignFormController>,
    toast_log: Vec<Toast>,
}

impl ConsoleModule {
    pub fn new(state: AppState) -> Self {
        let size = state.page_size;
        let toasts = state.notifications.clone();
        Self {
            countries: CrudList::new(size, toasts.clone()),
            dealers: CrudList::new(size, toasts.clone()),
            clients: CrudList::new(size, toasts.clone()),
            branches: CrudList::new(size, toasts.clone()),
            campaigns: CrudList::new(size, toasts.clone()),
            marketing_users: CrudList::new(size, toasts.clone()),
            marketing_groups: CrudList::new(size, toasts.clone()),
            marketing_campaigns: CrudList::new(size, toasts),
            campaign_form: None,
            toast_log: Vec::new(),
            state,
        }
    }

    /// `promodash> ` normally, `promodash [Summer Spin (#1) / Rewards]> `
    /// while a campaign form is open.
    pub fn prompt_string(&self) -> String {
        match &self.campaign_form {
            Some(form) => format!("promodash [{} / {}]> ", form.title(), form.section()),
            None => "promodash> ".to_string(),
        }
    }

    /// Toasts raised since the last call. They are also kept for `toasts`.
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        let fresh = self.state.notifications.drain();
        self.toast_log.extend(fresh.iter().cloned());
        let overflow = self.toast_log.len().saturating_sub(TOAST_LOG_SIZE);
        self.toast_log.drain(..overflow);
        fresh
    }

    pub fn toast_log(&self) -> &[Toast] {
        &self.toast_log
    }
}
