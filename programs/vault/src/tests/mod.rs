mod ledger;

mod deposit;
