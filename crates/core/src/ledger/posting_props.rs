//! Property-based tests for the posting rules.
//!
//! Drives accounts, invoices and transactions through random hold / accept /
//! reject sequences using only the domain types, then checks conservation,
//! non-negativity and that every trail replays.

use chrono::Utc;
use proptest::prelude::*;
use vault_shared::types::Money;

use super::account::{Account, account_with_balance};
use super::audit::replay;
use super::balance_change::{BalanceChange, ChangeKind};
use super::error::TransferError;
use super::invoice::Invoice;
use super::transaction::{Settlement, Transaction};

/// One step of a random scenario.
#[derive(Debug, Clone)]
enum Step {
    /// Hold `amount` from account `source` into account `destination`.
    Hold {
        source: usize,
        destination: usize,
        amount: i64,
    },
    /// Settle the n-th open transaction (modulo the number open).
    Settle { pick: usize, accept: bool },
}

fn step_strategy(accounts: usize) -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..accounts, 0..accounts, 1i64..2_000).prop_map(|(source, destination, amount)| {
            Step::Hold {
                source,
                destination,
                amount,
            }
        }),
        (any::<usize>(), any::<bool>()).prop_map(|(pick, accept)| Step::Settle { pick, accept }),
    ]
}

fn balances_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..5_000, 2..6)
}

/// Minimal in-memory ledger mirroring what the engine does per call.
struct Book {
    accounts: Vec<Account>,
    open: Vec<Transaction>,
    changes: Vec<BalanceChange>,
}

impl Book {
    fn new(balances: &[i64]) -> Self {
        Self {
            accounts: balances.iter().map(|&b| account_with_balance(b)).collect(),
            open: Vec::new(),
            changes: Vec::new(),
        }
    }

    fn hold(
        &mut self,
        source: usize,
        destination: usize,
        amount: i64,
    ) -> Result<(), TransferError> {
        let invoice = Invoice::new_for_test(Money::new(amount), self.accounts[destination].id);
        let tx = Transaction::authorize(&invoice, self.accounts[source].id, Utc::now());
        let posting = self.accounts[source].post(ChangeKind::Hold, tx.amount)?;
        self.changes.push(BalanceChange::record(&posting, tx.id, Utc::now()));
        self.open.push(tx);
        Ok(())
    }

    fn settle(&mut self, pick: usize, settlement: Settlement) {
        if self.open.is_empty() {
            return;
        }
        let mut tx = self.open.remove(pick % self.open.len());
        tx.close(settlement, Utc::now()).unwrap();
        let beneficiary = settlement.beneficiary(&tx);
        let account = self
            .accounts
            .iter_mut()
            .find(|a| a.id == beneficiary)
            .unwrap();
        let posting = account.post(settlement.change_kind(), tx.amount).unwrap();
        self.changes.push(BalanceChange::record(&posting, tx.id, Utc::now()));
    }

    fn total(&self) -> i64 {
        self.accounts.iter().map(|a| a.balance.minor()).sum()
    }

    fn in_flight(&self) -> i64 {
        self.open.iter().map(|t| t.amount.minor()).sum()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// **Property: money is conserved**
    ///
    /// *For any* sequence of holds and settlements, the sum of balances plus
    /// the amounts held in open transactions equals the opening total.
    #[test]
    fn prop_conservation(
        balances in balances_strategy(),
        steps in prop::collection::vec(step_strategy(6), 0..40),
    ) {
        let mut book = Book::new(&balances);
        let opening: i64 = balances.iter().sum();
        let n = balances.len();

        for step in steps {
            match step {
                Step::Hold { source, destination, amount } => {
                    let _ = book.hold(source % n, destination % n, amount);
                }
                Step::Settle { pick, accept } => {
                    let settlement = if accept { Settlement::Accept } else { Settlement::Reject };
                    book.settle(pick, settlement);
                }
            }
            prop_assert_eq!(book.total() + book.in_flight(), opening);
        }
    }

    /// **Property: balances never go negative**
    #[test]
    fn prop_non_negative(
        balances in balances_strategy(),
        steps in prop::collection::vec(step_strategy(6), 0..40),
    ) {
        let mut book = Book::new(&balances);
        let n = balances.len();

        for step in steps {
            match step {
                Step::Hold { source, destination, amount } => {
                    let before = book.accounts[source % n].balance;
                    let result = book.hold(source % n, destination % n, amount);
                    if result.is_err() {
                        prop_assert_eq!(book.accounts[source % n].balance, before);
                    }
                }
                Step::Settle { pick, accept } => {
                    let settlement = if accept { Settlement::Accept } else { Settlement::Reject };
                    book.settle(pick, settlement);
                }
            }
            for account in &book.accounts {
                prop_assert!(!account.balance.is_negative());
            }
        }
    }

    /// **Property: hold then reject is the identity on balances**
    #[test]
    fn prop_hold_reject_restores(opening in 0i64..10_000, amount in 1i64..10_000) {
        let mut book = Book::new(&[opening, 0]);
        if book.hold(0, 1, amount).is_ok() {
            book.settle(0, Settlement::Reject);
        }
        prop_assert_eq!(book.accounts[0].balance, Money::new(opening));
        prop_assert_eq!(book.accounts[1].balance, Money::ZERO);
    }

    /// **Property: every trail replays to the stored balance**
    #[test]
    fn prop_audit_replay(
        balances in balances_strategy(),
        steps in prop::collection::vec(step_strategy(6), 0..40),
    ) {
        let mut book = Book::new(&balances);
        let n = balances.len();

        for step in steps {
            match step {
                Step::Hold { source, destination, amount } => {
                    let _ = book.hold(source % n, destination % n, amount);
                }
                Step::Settle { pick, accept } => {
                    let settlement = if accept { Settlement::Accept } else { Settlement::Reject };
                    book.settle(pick, settlement);
                }
            }
        }

        for (account, &opening) in book.accounts.iter().zip(&balances) {
            let trail: Vec<_> = book
                .changes
                .iter()
                .filter(|c| c.account_id == account.id)
                .cloned()
                .collect();
            prop_assert_eq!(replay(account.id, Money::new(opening), &trail), Ok(account.balance));
        }
    }
}
