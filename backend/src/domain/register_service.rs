//! Register session logic for the stock register.
//!
//! This is the entry point a presentation layer drives: pick a month, edit
//! days, start over. Every edit re-runs the ledger engine over the whole month
//! and saves the result. Persistence never blocks the user: corrupt stored
//! months come back as "nothing selected", and failed saves are only logged.

use chrono::NaiveDate;
use log::{error, info, warn};
use shared::{DailyInput, MonthKey, MonthRegister, Stock, StockReceived};

use crate::domain::ledger_service::LedgerService;
use crate::storage::{Connection, RegisterStorage};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RegisterError {
    #[error("No month is selected")]
    NoMonthSelected,
    #[error("Month {0} is not a valid calendar month")]
    InvalidMonth(MonthKey),
    #[error("Date {date} is outside the selected month {month}")]
    DateOutsideMonth { date: NaiveDate, month: MonthKey },
}

struct RegisterSession {
    key: MonthKey,
    register: MonthRegister,
}

pub struct RegisterService<C: Connection> {
    register_repository: C::RegisterRepository,
    ledger_service: LedgerService,
    session: Option<RegisterSession>,
}

impl<C: Connection> RegisterService<C> {
    pub fn new(connection: &C, ledger_service: LedgerService) -> Self {
        Self {
            register_repository: connection.create_register_repository(),
            ledger_service,
            session: None,
        }
    }

    pub fn selected_month(&self) -> Option<MonthKey> {
        self.session.as_ref().map(|s| s.key)
    }

    pub fn current(&self) -> Option<&MonthRegister> {
        self.session.as_ref().map(|s| &s.register)
    }

    /// Resume a previously stored month.
    ///
    /// Returns `None` when the month is absent, was corrupt, or could not be
    /// read. Any earlier selection is dropped in that case.
    pub fn open_month(&mut self, key: MonthKey) -> Option<&MonthRegister> {
        self.session = None;

        if !key.is_valid() {
            warn!("Ignoring request to open invalid month {}", key);
            return None;
        }

        let register = match self.register_repository.load_register(key) {
            Ok(Some(register)) => register,
            Ok(None) => {
                info!("No stored register for {}", key);
                return None;
            }
            Err(e) => {
                error!("Failed to read stored register for {}: {}", key, e);
                return None;
            }
        };

        info!("Opened stored register for {}", key);
        self.session = Some(RegisterSession { key, register });
        self.current()
    }

    /// Start a month from an opening balance with no activity recorded yet
    pub fn select_month(
        &mut self,
        key: MonthKey,
        opening_balance: Stock,
    ) -> Result<&MonthRegister, RegisterError> {
        if !key.is_valid() {
            return Err(RegisterError::InvalidMonth(key));
        }

        let register = MonthRegister {
            day_records: self
                .ledger_service
                .recalculate(key.month, key.year, &opening_balance, &[]),
            opening_balance,
        };

        info!("Selected {} with {} days", key, register.day_records.len());
        save_best_effort(&self.register_repository, key, &register);

        let session = self.session.insert(RegisterSession { key, register });
        Ok(&session.register)
    }

    /// Replace one day's inputs and recompute the whole month from day 1.
    ///
    /// Negative headcounts and receipts are clamped to zero before the
    /// recalculation runs.
    pub fn update_day(&mut self, input: DailyInput) -> Result<&MonthRegister, RegisterError> {
        let session = self.session.as_mut().ok_or(RegisterError::NoMonthSelected)?;

        if !session.key.contains(input.date) {
            return Err(RegisterError::DateOutsideMonth {
                date: input.date,
                month: session.key,
            });
        }

        let input = clamp_input(input);
        let mut inputs = session.register.inputs();
        match inputs.iter_mut().find(|existing| existing.date == input.date) {
            Some(slot) => *slot = input,
            None => inputs.push(input),
        }

        session.register.day_records = self.ledger_service.recalculate(
            session.key.month,
            session.key.year,
            &session.register.opening_balance,
            &inputs,
        );

        save_best_effort(&self.register_repository, session.key, &session.register);
        Ok(&session.register)
    }

    /// Forget the selected month and delete its stored state
    pub fn reset(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        match self.register_repository.delete_register(session.key) {
            Ok(_) => info!("Reset register for {}", session.key),
            Err(e) => error!("Failed to delete stored register for {}: {}", session.key, e),
        }
    }

    /// Closing balance of the month before `key`, if that month is stored.
    /// Used to pre-fill the opening balance when a new month is selected.
    pub fn carried_forward_opening(&self, key: MonthKey) -> Option<Stock> {
        let previous = key.previous();
        match self.register_repository.load_register(previous) {
            Ok(register) => register.and_then(|r| r.final_closing_balance()),
            Err(e) => {
                warn!("Could not read {} to carry its balance forward: {}", previous, e);
                None
            }
        }
    }
}

fn save_best_effort<S: RegisterStorage>(repository: &S, key: MonthKey, register: &MonthRegister) {
    if let Err(e) = repository.save_register(key, register) {
        error!("Failed to save register for {}: {}", key, e);
    }
}

fn clamp_quantity(quantity: f64) -> f64 {
    if quantity.is_finite() && quantity > 0.0 { quantity } else { 0.0 }
}

fn clamp_input(input: DailyInput) -> DailyInput {
    DailyInput {
        primary_students: input.primary_students.max(0),
        upper_primary_students: input.upper_primary_students.max(0),
        stock_received: StockReceived {
            primary: input.stock_received.primary.map(|_, q| clamp_quantity(q)),
            upper_primary: input.stock_received.upper_primary.map(|_, q| clamp_quantity(q)),
        },
        ..input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::json::test_utils::TestEnvironment;
    use crate::storage::JsonConnection;
    use std::fs;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn opening() -> Stock {
        Stock { rice: 50.0, dhal: 10.0, oil: 5.0, salt: 2.0, gram: 3.0, chickpea: 3.0, egg: 0.0 }
    }

    fn create_service(env: &TestEnvironment) -> RegisterService<JsonConnection> {
        RegisterService::new(&env.connection, LedgerService::new())
    }

    #[test]
    fn test_select_month_builds_and_saves_empty_month() {
        let env = TestEnvironment::new().unwrap();
        let mut service = create_service(&env);
        let key = MonthKey::new(2025, 6);

        let register = service.select_month(key, opening()).unwrap().clone();
        assert_eq!(register.day_records.len(), 30);
        assert_eq!(register.opening_balance, opening());
        assert_eq!(service.selected_month(), Some(key));

        let stored = env.connection.create_register_repository().load_register(key).unwrap();
        assert_eq!(stored, Some(register));
    }

    #[test]
    fn test_select_invalid_month() {
        let env = TestEnvironment::new().unwrap();
        let mut service = create_service(&env);

        let result = service.select_month(MonthKey::new(2025, 13), opening());
        assert_eq!(result.err(), Some(RegisterError::InvalidMonth(MonthKey::new(2025, 13))));
        assert_eq!(service.selected_month(), None);
    }

    #[test]
    fn test_update_day_requires_selection() {
        let env = TestEnvironment::new().unwrap();
        let mut service = create_service(&env);

        let result = service.update_day(DailyInput::empty(date(2025, 6, 2)));
        assert_eq!(result.err(), Some(RegisterError::NoMonthSelected));
    }

    #[test]
    fn test_update_day_rejects_other_month() {
        let env = TestEnvironment::new().unwrap();
        let mut service = create_service(&env);
        service.select_month(MonthKey::new(2025, 6), opening()).unwrap();

        let result = service.update_day(DailyInput::empty(date(2025, 7, 1)));
        assert_eq!(
            result.err(),
            Some(RegisterError::DateOutsideMonth {
                date: date(2025, 7, 1),
                month: MonthKey::new(2025, 6),
            })
        );
    }

    #[test]
    fn test_update_day_recalculates_and_persists() {
        let env = TestEnvironment::new().unwrap();
        let mut service = create_service(&env);
        let key = MonthKey::new(2025, 6);
        service.select_month(key, opening()).unwrap();

        let mut input = DailyInput::empty(date(2025, 6, 2));
        input.primary_students = 20;
        input.stock_received.primary.rice = 10.0;
        let register = service.update_day(input).unwrap().clone();

        let day = register.record_for(date(2025, 6, 2)).unwrap();
        assert!((day.consumption.rice - 2.0).abs() < 1e-9);
        assert!((register.final_closing_balance().unwrap().rice - 58.0).abs() < 1e-9);

        // A later edit keeps the earlier one
        let mut later = DailyInput::empty(date(2025, 6, 3));
        later.upper_primary_students = 10;
        let register = service.update_day(later).unwrap().clone();
        assert_eq!(register.record_for(date(2025, 6, 2)).unwrap().primary_students, 20);
        assert!((register.final_closing_balance().unwrap().rice - 56.5).abs() < 1e-9);

        let stored = env.connection.create_register_repository().load_register(key).unwrap();
        assert_eq!(stored, Some(register));
    }

    #[test]
    fn test_update_day_clamps_negative_values() {
        let env = TestEnvironment::new().unwrap();
        let mut service = create_service(&env);
        service.select_month(MonthKey::new(2025, 6), opening()).unwrap();

        let mut input = DailyInput::empty(date(2025, 6, 2));
        input.primary_students = -5;
        input.upper_primary_students = 4;
        input.stock_received.primary.rice = -10.0;
        input.stock_received.upper_primary.egg = f64::NAN;
        input.stock_received.upper_primary.dhal = 2.5;

        let register = service.update_day(input).unwrap();
        let day = register.record_for(date(2025, 6, 2)).unwrap();
        assert_eq!(day.primary_students, 0);
        assert_eq!(day.upper_primary_students, 4);
        assert_eq!(day.stock_received.primary.rice, 0.0);
        assert_eq!(day.stock_received.upper_primary.egg, 0.0);
        assert_eq!(day.stock_received.upper_primary.dhal, 2.5);
    }

    #[test]
    fn test_open_month_resumes_stored_state() {
        let env = TestEnvironment::new().unwrap();
        let key = MonthKey::new(2025, 6);
        {
            let mut service = create_service(&env);
            service.select_month(key, opening()).unwrap();
            let mut input = DailyInput::empty(date(2025, 6, 4));
            input.primary_students = 12;
            service.update_day(input).unwrap();
        }

        let mut service = create_service(&env);
        let register = service.open_month(key).unwrap();
        assert_eq!(register.record_for(date(2025, 6, 4)).unwrap().primary_students, 12);
        assert_eq!(service.selected_month(), Some(key));
    }

    #[test]
    fn test_open_corrupt_month_stays_unselected() {
        let env = TestEnvironment::new().unwrap();
        let key = MonthKey::new(2025, 6);
        let dir = env.connection.ensure_registers_directory().unwrap();
        let path = dir.join("stock-register-2025-06.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let mut service = create_service(&env);
        assert!(service.open_month(key).is_none());
        assert_eq!(service.selected_month(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_open_absent_month_drops_previous_selection() {
        let env = TestEnvironment::new().unwrap();
        let mut service = create_service(&env);
        service.select_month(MonthKey::new(2025, 6), opening()).unwrap();

        assert!(service.open_month(MonthKey::new(2025, 8)).is_none());
        assert_eq!(service.selected_month(), None);
        assert!(service.current().is_none());
    }

    #[test]
    fn test_open_corrupt_month_drops_previous_selection() {
        let env = TestEnvironment::new().unwrap();
        let mut service = create_service(&env);
        service.select_month(MonthKey::new(2025, 6), opening()).unwrap();

        let dir = env.connection.ensure_registers_directory().unwrap();
        fs::write(dir.join("stock-register-2025-07.json"), "{ broken").unwrap();

        assert!(service.open_month(MonthKey::new(2025, 7)).is_none());
        assert_eq!(service.selected_month(), None);
    }

    #[test]
    fn test_failed_saves_do_not_fail_edits() {
        let env = TestEnvironment::new().unwrap();
        // A plain file where the registers directory belongs makes every save fail
        fs::write(env.base_path.join("registers"), "not a directory").unwrap();

        let mut service = create_service(&env);
        let key = MonthKey::new(2025, 6);

        let register = service.select_month(key, opening()).unwrap();
        assert_eq!(register.day_records.len(), 30);
        assert_eq!(service.selected_month(), Some(key));

        let mut input = DailyInput::empty(date(2025, 6, 2));
        input.primary_students = 20;
        let register = service.update_day(input).unwrap();
        let day = register.record_for(date(2025, 6, 2)).unwrap();
        assert!((day.consumption.rice - 2.0).abs() < 1e-9);
        assert!((register.final_closing_balance().unwrap().rice - 48.0).abs() < 1e-9);

        assert_eq!(env.connection.create_register_repository().load_register(key).unwrap(), None);
    }

    #[test]
    fn test_reset_clears_selection_and_storage() {
        let env = TestEnvironment::new().unwrap();
        let mut service = create_service(&env);
        let key = MonthKey::new(2025, 6);
        service.select_month(key, opening()).unwrap();

        service.reset();
        assert_eq!(service.selected_month(), None);
        assert!(service.current().is_none());
        assert_eq!(env.connection.create_register_repository().load_register(key).unwrap(), None);

        // Resetting with nothing selected is a no-op
        service.reset();
    }

    #[test]
    fn test_carried_forward_opening() {
        let env = TestEnvironment::new().unwrap();
        let mut service = create_service(&env);

        assert_eq!(service.carried_forward_opening(MonthKey::new(2025, 1)), None);

        service.select_month(MonthKey::new(2024, 12), opening()).unwrap();
        let mut input = DailyInput::empty(date(2024, 12, 2));
        input.primary_students = 10;
        let december = service.update_day(input).unwrap().clone();

        let carried = service.carried_forward_opening(MonthKey::new(2025, 1)).unwrap();
        assert_eq!(Some(carried), december.final_closing_balance());
    }
}
