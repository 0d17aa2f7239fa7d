use chrono::NaiveDate;
use creditline::lending::{Customer, CustomerId, CustomerStore, Loan, LoanId, StoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store backing the service. Sequences track the highest
/// persisted id so seeded records and registrations share one id space.
#[derive(Default)]
pub(crate) struct InMemoryCustomerStore {
    customers: Mutex<HashMap<CustomerId, Customer>>,
    loans: Mutex<HashMap<LoanId, Loan>>,
    customer_seq: AtomicU32,
    loan_seq: AtomicU32,
}

impl CustomerStore for InMemoryCustomerStore {
    fn find_customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let guard = self.customers.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    fn loans_for_customer(&self, id: CustomerId) -> Result<Vec<Loan>, StoreError> {
        let guard = self.loans.lock().map_err(poisoned)?;
        Ok(guard
            .values()
            .filter(|loan| loan.customer_id == id)
            .cloned()
            .collect())
    }

    fn find_loan(&self, id: LoanId) -> Result<Option<Loan>, StoreError> {
        let guard = self.loans.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    fn all_customers(&self) -> Result<Vec<Customer>, StoreError> {
        let guard = self.customers.lock().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }

    fn all_loans(&self) -> Result<Vec<Loan>, StoreError> {
        let guard = self.loans.lock().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }

    fn next_customer_id(&self) -> Result<CustomerId, StoreError> {
        Ok(CustomerId(
            self.customer_seq.fetch_add(1, Ordering::Relaxed) + 1,
        ))
    }

    fn next_loan_id(&self) -> Result<LoanId, StoreError> {
        Ok(LoanId(self.loan_seq.fetch_add(1, Ordering::Relaxed) + 1))
    }

    fn persist_customer(&self, customer: Customer) -> Result<(), StoreError> {
        let mut guard = self.customers.lock().map_err(poisoned)?;
        if guard.contains_key(&customer.id) {
            return Err(StoreError::Conflict);
        }
        self.customer_seq.fetch_max(customer.id.0, Ordering::Relaxed);
        guard.insert(customer.id, customer);
        Ok(())
    }

    fn persist_loan(&self, loan: Loan) -> Result<(), StoreError> {
        let mut guard = self.loans.lock().map_err(poisoned)?;
        if guard.contains_key(&loan.id) {
            return Err(StoreError::Conflict);
        }
        self.loan_seq.fetch_max(loan.id.0, Ordering::Relaxed);
        guard.insert(loan.id, loan);
        Ok(())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Unavailable("store mutex poisoned".to_string())
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use creditline::lending::end_date_for;

    fn customer(id: u32) -> Customer {
        Customer {
            id: CustomerId(id),
            first_name: "Asha".to_string(),
            last_name: "Verma".to_string(),
            age: 34,
            phone_number: "9876501234".to_string(),
            monthly_income: 50_000.0,
            approved_limit: 1_800_000.0,
            current_debt: 0.0,
        }
    }

    #[test]
    fn sequences_skip_past_seeded_ids() {
        let store = InMemoryCustomerStore::default();
        store.persist_customer(customer(7)).expect("persists");

        let next = store.next_customer_id().expect("id");
        assert_eq!(next, CustomerId(8));
    }

    #[test]
    fn duplicate_ids_conflict() {
        let store = InMemoryCustomerStore::default();
        store.persist_customer(customer(1)).expect("persists");
        match store.persist_customer(customer(1)) {
            Err(StoreError::Conflict) => {}
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn loans_are_scoped_to_their_customer() {
        let store = InMemoryCustomerStore::default();
        let approved = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
        store
            .persist_loan(Loan {
                id: LoanId(1),
                customer_id: CustomerId(1),
                principal: 100_000.0,
                term_months: 12,
                annual_rate_percent: 10.0,
                monthly_payment: 8_791.59,
                emis_paid_on_time: 0,
                approved_on: approved,
                end_date: end_date_for(approved, 12),
            })
            .expect("persists");

        assert_eq!(
            store.loans_for_customer(CustomerId(1)).expect("lists").len(),
            1
        );
        assert!(store
            .loans_for_customer(CustomerId(2))
            .expect("lists")
            .is_empty());
    }
}
