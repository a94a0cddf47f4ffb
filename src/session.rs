//! Session state: catalog lifecycle, fetch staleness, and the gated
//! add-to-cart flow.
//!
//! One logical actor mutates this state; every operation runs to completion
//! inside a user-interaction handler. The only asynchronous boundary is the
//! menu fetch, guarded by tickets so a superseded response is discarded
//! instead of applied.

use tracing::{info, warn};

use crate::domain::cart::{fingerprint, option_summary, Cart, CartLine};
use crate::domain::catalog::{Catalog, OptionItem};
use crate::domain::events::{CatalogEvent, DomainEvent};
use crate::domain::pricing::{self, OrderTerms};
use crate::domain::selection::{validate, Selection};
use crate::menu::normalize;
use crate::menu::source::{FetchError, HttpMenuSource};
use crate::{OrderError, Result};

/// Catalog lifecycle: one fetch at startup, retry on failure.
#[derive(Clone, Debug, Default)]
pub enum CatalogState {
    #[default]
    Loading,
    Ready(Catalog),
    Failed(String),
}

/// Identifies one in-flight fetch. A response presented with a ticket that is
/// no longer current is stale and gets dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Explicit application state owned by the embedding UI: the catalog, the
/// cart, and the fetch epoch. The presentation layer reads it and calls the
/// operations below; it never mutates the fields directly.
#[derive(Debug, Default)]
pub struct Session {
    catalog: CatalogState,
    cart: Cart,
    epoch: u64,
    events: Vec<DomainEvent>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Start (or retry) the menu fetch. Any earlier ticket becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.epoch += 1;
        self.catalog = CatalogState::Loading;
        FetchTicket(self.epoch)
    }

    /// Apply a fetch outcome. Returns `false` when the ticket is stale and
    /// the outcome was discarded. A failed (re)fetch only touches the catalog
    /// state — a cart built beforehand survives it.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        outcome: std::result::Result<Catalog, FetchError>,
    ) -> bool {
        if ticket.0 != self.epoch {
            warn!(ticket = ticket.0, epoch = self.epoch, "discarding stale menu response");
            return false;
        }
        match outcome {
            Ok(catalog) => {
                info!(categories = catalog.categories.len(), "menu loaded");
                self.events.push(DomainEvent::Catalog(CatalogEvent::Loaded {
                    categories: catalog.categories.len(),
                }));
                self.catalog = CatalogState::Ready(catalog);
            }
            Err(err) => {
                warn!(error = %err, "menu fetch failed");
                self.events.push(DomainEvent::Catalog(CatalogEvent::FetchFailed {
                    reason: err.to_string(),
                }));
                self.catalog = CatalogState::Failed(err.to_string());
            }
        }
        true
    }

    /// Fetch, normalize and apply in one step. Returns `false` when a
    /// concurrent retry superseded this load.
    pub async fn load_from(&mut self, source: &HttpMenuSource) -> bool {
        let ticket = self.begin_fetch();
        let outcome = source.fetch().await.map(normalize::normalize);
        self.apply_fetch(ticket, outcome)
    }

    /// The flow behind the "add" button: look the product up, validate the
    /// selection, price it, and reconcile the result into the cart. Returns
    /// the cart-line fingerprint.
    ///
    /// On a rejected selection nothing is modified and the failing groups
    /// come back inside the error, first failing group first; the caller
    /// keeps the visitor's partial selection.
    pub fn add_to_cart(
        &mut self,
        product_id: &str,
        selection: &Selection,
        quantity: u32,
        terms: OrderTerms,
    ) -> Result<String> {
        let CatalogState::Ready(catalog) = &self.catalog else {
            return Err(OrderError::CatalogNotReady);
        };
        let product = catalog
            .find_product(product_id)
            .ok_or_else(|| OrderError::ProductNotFound(product_id.to_string()))?;

        let failures = validate(&product.groups, selection);
        if !failures.is_empty() {
            return Err(OrderError::InvalidSelection { failures });
        }

        let selected: Vec<&OptionItem> = product
            .groups
            .iter()
            .flat_map(|g| {
                selection
                    .chosen(&g.id)
                    .iter()
                    .filter_map(move |id| g.option(id))
            })
            .collect();

        let unit_price = pricing::unit_price(product, terms, selected.iter().copied());
        let surcharges = pricing::surcharge_total(selected.iter().copied());
        let id = fingerprint(product, selection);
        let line = CartLine::new(
            id.clone(),
            product.id.clone(),
            product.name.clone(),
            unit_price,
            quantity.max(1),
            option_summary(product, selection),
            surcharges,
        );
        self.cart.add_or_merge(line);
        Ok(id)
    }

    pub fn set_quantity(&mut self, line_id: &str, quantity: u32) {
        self.cart.set_quantity(line_id, quantity);
    }

    pub fn remove_line(&mut self, line_id: &str) {
        self.cart.remove(line_id);
    }

    /// Drain everything that changed since the last call, catalog transitions
    /// first, then cart mutations in order.
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        let mut events = std::mem::take(&mut self.events);
        events.extend(self.cart.take_events().into_iter().map(DomainEvent::Cart));
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::selection::FailureKind;
    use crate::domain::value_objects::Money;
    use crate::menu::wire::RawCategory;

    /// The "Naan A" menu: required single-choice crudités, required
    /// multi-choice sauces (max 2), optional menu formula at +2,00€.
    fn naan_json() -> serde_json::Value {
        serde_json::json!([
            {
                "name": "Naans",
                "description": "Nos naans garnis maison",
                "sort_order": 0,
                "is_active": true,
                "id": "cat-naan-001",
                "products": [
                    {
                        "name": "Naan A",
                        "description": "Double steak, Pomme de terre, Cheddar",
                        "price": 9.00,
                        "is_active": true,
                        "sort_order": 0,
                        "id": "prod-naan-001",
                        "image_url": null,
                        "supplement_groups": [
                            {
                                "name": "Crudités",
                                "description": "",
                                "is_required": true,
                                "min_selection": 1,
                                "max_selection": 1,
                                "sort_order": 0,
                                "id": "grp-crudites",
                                "supplements": [
                                    { "name": "Aucune", "price": 0.0, "is_active": true, "sort_order": 0, "id": "opt-aucune", "image_url": null },
                                    { "name": "Toutes", "price": 0.0, "is_active": true, "sort_order": 1, "id": "opt-toutes", "image_url": null }
                                ]
                            },
                            {
                                "name": "Sauces",
                                "description": "Max 2",
                                "is_required": true,
                                "min_selection": 1,
                                "max_selection": 2,
                                "sort_order": 1,
                                "id": "grp-sauces",
                                "supplements": [
                                    { "name": "Blanche", "price": 0.0, "is_active": true, "sort_order": 0, "id": "opt-blanche", "image_url": null },
                                    { "name": "Harissa", "price": 0.0, "is_active": true, "sort_order": 1, "id": "opt-harissa", "image_url": null },
                                    { "name": "Ketchup", "price": 0.0, "is_active": true, "sort_order": 2, "id": "opt-ketchup", "image_url": null }
                                ]
                            },
                            {
                                "name": "Menu",
                                "description": "",
                                "is_required": false,
                                "min_selection": 0,
                                "max_selection": 1,
                                "sort_order": 2,
                                "id": "grp-menu",
                                "supplements": [
                                    { "name": "Formule", "price": 2.0, "is_active": true, "sort_order": 0, "id": "opt-formule", "image_url": null }
                                ]
                            }
                        ]
                    }
                ]
            }
        ])
    }

    fn naan_payload() -> Vec<RawCategory> {
        serde_json::from_value(naan_json()).expect("payload parses")
    }

    fn ready_session() -> Session {
        let mut session = Session::new();
        let ticket = session.begin_fetch();
        assert!(session.apply_fetch(ticket, Ok(normalize::normalize(naan_payload()))));
        session
    }

    fn group<'a>(session: &'a Session, product_id: &str, group_id: &str) -> &'a crate::domain::catalog::OptionGroup {
        let CatalogState::Ready(catalog) = session.catalog() else {
            panic!("catalog not ready");
        };
        catalog.find_product(product_id).unwrap().group(group_id).unwrap()
    }

    #[test]
    fn fetch_lifecycle_reaches_ready() {
        let session = ready_session();
        assert!(matches!(session.catalog(), CatalogState::Ready(c) if c.categories.len() == 1));
    }

    #[test]
    fn stale_fetch_response_is_discarded() {
        let mut session = Session::new();
        let first = session.begin_fetch();
        let second = session.begin_fetch();

        assert!(!session.apply_fetch(first, Ok(normalize::normalize(naan_payload()))));
        assert!(matches!(session.catalog(), CatalogState::Loading));

        assert!(session.apply_fetch(second, Ok(normalize::normalize(naan_payload()))));
        assert!(matches!(session.catalog(), CatalogState::Ready(_)));
    }

    #[test]
    fn failed_refetch_keeps_the_cart() {
        let mut session = ready_session();
        let mut sel = Selection::new();
        sel.toggle(group(&session, "prod-naan-001", "grp-crudites"), "opt-toutes");
        sel.toggle(group(&session, "prod-naan-001", "grp-sauces"), "opt-blanche");
        session.add_to_cart("prod-naan-001", &sel, 1, OrderTerms::default()).unwrap();

        let ticket = session.begin_fetch();
        session.apply_fetch(ticket, Err(FetchError::Status(502)));

        assert!(matches!(session.catalog(), CatalogState::Failed(_)));
        assert_eq!(session.cart().lines().len(), 1);
    }

    #[test]
    fn add_to_cart_needs_a_catalog() {
        let mut session = Session::new();
        let err = session
            .add_to_cart("prod-naan-001", &Selection::new(), 1, OrderTerms::default())
            .unwrap_err();
        assert!(matches!(err, OrderError::CatalogNotReady));
    }

    #[test]
    fn add_to_cart_rejects_unknown_products() {
        let mut session = ready_session();
        let err = session
            .add_to_cart("prod-nope", &Selection::new(), 1, OrderTerms::default())
            .unwrap_err();
        assert!(matches!(err, OrderError::ProductNotFound(id) if id == "prod-nope"));
    }

    #[test]
    fn invalid_selection_never_reaches_the_cart() {
        let mut session = ready_session();
        let mut sel = Selection::new();
        sel.toggle(group(&session, "prod-naan-001", "grp-sauces"), "opt-blanche");

        let err = session
            .add_to_cart("prod-naan-001", &sel, 1, OrderTerms::default())
            .unwrap_err();
        match err {
            OrderError::InvalidSelection { failures } => {
                // First failing group in the product's group order.
                assert_eq!(failures[0].group_id, "grp-crudites");
                assert_eq!(failures[0].kind, FailureKind::UnmetMinimum);
            }
            other => panic!("expected InvalidSelection, got {other:?}"),
        }
        assert!(session.cart().is_empty());
        // The partial selection is untouched and can be completed.
        sel.toggle(group(&session, "prod-naan-001", "grp-crudites"), "opt-toutes");
        session.add_to_cart("prod-naan-001", &sel, 1, OrderTerms::default()).unwrap();
        assert_eq!(session.cart().lines().len(), 1);
    }

    #[test]
    fn same_configuration_merges_whatever_the_click_order() {
        let mut session = ready_session();

        let mut first = Selection::new();
        first.toggle(group(&session, "prod-naan-001", "grp-crudites"), "opt-toutes");
        first.toggle(group(&session, "prod-naan-001", "grp-sauces"), "opt-blanche");
        first.toggle(group(&session, "prod-naan-001", "grp-sauces"), "opt-harissa");
        session.add_to_cart("prod-naan-001", &first, 2, OrderTerms::default()).unwrap();

        let mut second = Selection::new();
        second.toggle(group(&session, "prod-naan-001", "grp-sauces"), "opt-harissa");
        second.toggle(group(&session, "prod-naan-001", "grp-sauces"), "opt-blanche");
        second.toggle(group(&session, "prod-naan-001", "grp-crudites"), "opt-toutes");
        session.add_to_cart("prod-naan-001", &second, 1, OrderTerms::default()).unwrap();

        let lines = session.cart().lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity(), 3);
        assert_eq!(lines[0].unit_price(), Money::cents(900));
        assert_eq!(lines[0].line_total(), Money::cents(2700));
    }

    #[test]
    fn different_configuration_becomes_a_second_line() {
        let mut session = ready_session();

        let mut plain = Selection::new();
        plain.toggle(group(&session, "prod-naan-001", "grp-crudites"), "opt-toutes");
        plain.toggle(group(&session, "prod-naan-001", "grp-sauces"), "opt-blanche");
        plain.toggle(group(&session, "prod-naan-001", "grp-sauces"), "opt-harissa");
        session.add_to_cart("prod-naan-001", &plain, 3, OrderTerms::default()).unwrap();

        let mut with_menu = plain.clone();
        with_menu.toggle(group(&session, "prod-naan-001", "grp-menu"), "opt-formule");
        session.add_to_cart("prod-naan-001", &with_menu, 1, OrderTerms::default()).unwrap();

        let lines = session.cart().lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].unit_price(), Money::cents(900));
        assert_eq!(lines[1].unit_price(), Money::cents(1100));
        assert_eq!(lines[1].surcharge_total(), Money::cents(200));
        assert_eq!(session.cart().total(), Money::cents(3800));
    }

    #[test]
    fn quantity_zero_removes_via_session() {
        let mut session = ready_session();
        let mut sel = Selection::new();
        sel.toggle(group(&session, "prod-naan-001", "grp-crudites"), "opt-aucune");
        sel.toggle(group(&session, "prod-naan-001", "grp-sauces"), "opt-ketchup");
        let line_id = session.add_to_cart("prod-naan-001", &sel, 2, OrderTerms::default()).unwrap();

        session.set_quantity(&line_id, 0);
        assert!(session.cart().is_empty());

        session.add_to_cart("prod-naan-001", &sel, 1, OrderTerms::default()).unwrap();
        session.remove_line(&line_id);
        assert!(session.cart().is_empty());
    }

    #[test]
    fn events_report_catalog_and_cart_changes() {
        let mut session = ready_session();
        let mut sel = Selection::new();
        sel.toggle(group(&session, "prod-naan-001", "grp-crudites"), "opt-aucune");
        sel.toggle(group(&session, "prod-naan-001", "grp-sauces"), "opt-ketchup");
        let line_id = session.add_to_cart("prod-naan-001", &sel, 1, OrderTerms::default()).unwrap();

        let events = session.take_events();
        assert!(events.iter().any(|e| matches!(e, DomainEvent::Catalog(CatalogEvent::Loaded { categories: 1 }))));
        assert!(events.iter().any(|e| matches!(
            e,
            DomainEvent::Cart(crate::domain::events::CartEvent::LineAdded { line_id: id }) if *id == line_id
        )));
        assert!(session.take_events().is_empty());
    }

    #[tokio::test]
    async fn load_from_fetches_and_normalizes() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(naan_json()))
            .mount(&server)
            .await;

        let mut session = Session::new();
        let source = HttpMenuSource::new(server.uri());
        assert!(session.load_from(&source).await);
        assert!(matches!(session.catalog(), CatalogState::Ready(c) if c.find_product("prod-naan-001").is_some()));
    }

    #[tokio::test]
    async fn load_from_failure_surfaces_retryable_state() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut session = Session::new();
        let source = HttpMenuSource::new(server.uri());
        assert!(session.load_from(&source).await);
        assert!(matches!(session.catalog(), CatalogState::Failed(_)));
    }
}
