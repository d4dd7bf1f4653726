mod ids;
mod items;
mod parameters;
mod profile;
mod records;
mod scenario;

pub use ids::ItemId;
pub use items::{
    AssetItem, AssetKind, COST_CATEGORY, CorporateSalaryType, CostSettings,
    EMPLOYEE_SALARY_CATEGORY, ExpenseItem, ExpenseKind, IncomeItem, IncomeKind, IncomeRole,
    LiabilityItem, LiabilityKind, LifeEvent, LifeEventKind, LifeEventSource, RepaymentType,
    Section, YearFlags, YearMap,
};
pub use parameters::{CorporateTaxSettings, Parameters};
pub use profile::{
    BasicInfo, Child, EducationPlan, Housing, MaritalStatus, Mortgage, Occupation, SchoolType,
    SpouseInfo,
};
pub use records::{
    CashFlowRecord, CashFlowTable, CorporateCashFlow, CorporateTaxBreakdown, PersonalCashFlow,
    round1,
};
pub use scenario::{Book, LEGACY_HOUSING_LOAN_NAME, Scenario};
