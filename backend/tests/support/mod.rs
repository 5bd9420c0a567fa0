#![allow(dead_code)]

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use chrono::{NaiveDate, NaiveTime};
use hrportal_backend::{
    build_router,
    config::{Config, RuleBook, SmtpConfig},
    error::AppError,
    models::{
        attendance::{AttendanceRow, CellKey},
        employee::Employee,
    },
    repositories::{AttendanceRepositoryTrait, EmployeeRepositoryTrait},
    services::dispatch::{MailError, PayslipMailer, PayslipMessage},
    state::AppState,
    types::EmployeeId,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".into(),
        bind_addr: "127.0.0.1:0".into(),
        time_zone: chrono_tz::Asia::Ho_Chi_Minh,
        smtp: SmtpConfig {
            host: "localhost".into(),
            port: 2525,
            username: String::new(),
            password: String::new(),
            from_address: "NHTC Payroll <payroll@nhtc.com.vn>".into(),
            skip_send: true,
        },
        payslip_send_delay_secs: 0,
        rules: RuleBook::default(),
    }
}

pub fn employee(code: &str, name: &str, email: Option<&str>) -> Employee {
    Employee {
        id: EmployeeId::new(),
        code: code.into(),
        full_name: name.into(),
        email: email.map(str::to_string),
        department: Some("Kỹ thuật".into()),
        leave_quota: Some(96.0),
    }
}

pub fn worked_row(employee_id: EmployeeId, on: NaiveDate, standard: f64, ot: f64) -> AttendanceRow {
    AttendanceRow {
        employee_id,
        date: on,
        standard_hours: standard,
        ot_hours: ot,
        ot_weekend: 0.0,
        leave_hours: 0.0,
        is_onsite: false,
        onsite_mode: 0,
        onsite_place: 0,
        check_in: None,
        check_out: None,
    }
}

#[derive(Default)]
pub struct InMemoryEmployees {
    employees: Mutex<Vec<Employee>>,
}

impl InMemoryEmployees {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            employees: Mutex::new(employees),
        }
    }

    pub fn snapshot(&self) -> Vec<Employee> {
        self.employees.lock().expect("employees lock").clone()
    }
}

#[async_trait]
impl EmployeeRepositoryTrait for InMemoryEmployees {
    async fn list(&self) -> Result<Vec<Employee>, AppError> {
        let mut employees = self.snapshot();
        employees.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(employees)
    }

    async fn update_leave_quota(&self, id: EmployeeId, hours: f64) -> Result<bool, AppError> {
        let mut employees = self.employees.lock().expect("employees lock");
        match employees.iter_mut().find(|emp| emp.id == id) {
            Some(emp) => {
                emp.leave_quota = Some(hours);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn reset_leave_quotas(&self) -> Result<u64, AppError> {
        let mut employees = self.employees.lock().expect("employees lock");
        for emp in employees.iter_mut() {
            emp.leave_quota = Some(0.0);
        }
        Ok(employees.len() as u64)
    }
}

/// Attendance store keyed like the real table. Writes can be switched to
/// fail to exercise the revert path.
#[derive(Default)]
pub struct InMemoryAttendance {
    rows: Mutex<BTreeMap<CellKey, AttendanceRow>>,
    fail_writes: AtomicBool,
}

impl InMemoryAttendance {
    pub fn new(rows: Vec<AttendanceRow>) -> Self {
        Self {
            rows: Mutex::new(rows.into_iter().map(|row| (row.key(), row)).collect()),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn get(&self, employee_id: EmployeeId, on: NaiveDate) -> Option<AttendanceRow> {
        self.rows
            .lock()
            .expect("rows lock")
            .get(&CellKey::new(employee_id, on))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().expect("rows lock").len()
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(AppError::InternalServerError(anyhow::anyhow!("connection reset")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AttendanceRepositoryTrait for InMemoryAttendance {
    async fn list_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRow>, AppError> {
        Ok(self
            .rows
            .lock()
            .expect("rows lock")
            .values()
            .filter(|row| row.date >= from && row.date <= to)
            .cloned()
            .collect())
    }

    async fn upsert_many(&self, rows: &[AttendanceRow]) -> Result<(), AppError> {
        self.check_writable()?;
        let mut stored = self.rows.lock().expect("rows lock");
        for row in rows {
            stored.insert(row.key(), row.clone());
        }
        Ok(())
    }

    async fn delete_many(&self, keys: &[CellKey]) -> Result<u64, AppError> {
        self.check_writable()?;
        let mut stored = self.rows.lock().expect("rows lock");
        Ok(keys.iter().filter(|key| stored.remove(key).is_some()).count() as u64)
    }
}

/// Records every payslip; addresses listed in `reject` fail with a
/// transport error.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<PayslipMessage>>,
    pub reject: Vec<String>,
}

impl RecordingMailer {
    pub fn rejecting(addresses: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reject: addresses.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn sent(&self) -> Vec<PayslipMessage> {
        self.sent.lock().expect("sent lock").clone()
    }
}

#[async_trait]
impl PayslipMailer for RecordingMailer {
    async fn send(&self, message: PayslipMessage) -> Result<(), MailError> {
        if self.reject.contains(&message.to) {
            return Err(MailError::Transport("550 mailbox unavailable".into()));
        }
        self.sent.lock().expect("sent lock").push(message);
        Ok(())
    }
}

/// A router over in-memory stores, with handles kept for assertions.
pub struct TestApp {
    pub router: Router,
    pub employees: Arc<InMemoryEmployees>,
    pub attendance: Arc<InMemoryAttendance>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub fn new(employees: Vec<Employee>, rows: Vec<AttendanceRow>) -> Self {
        Self::with_mailer(employees, rows, RecordingMailer::default())
    }

    pub fn with_mailer(
        employees: Vec<Employee>,
        rows: Vec<AttendanceRow>,
        mailer: RecordingMailer,
    ) -> Self {
        Self::with_config(employees, rows, mailer, test_config())
    }

    pub fn with_config(
        employees: Vec<Employee>,
        rows: Vec<AttendanceRow>,
        mailer: RecordingMailer,
        config: Config,
    ) -> Self {
        let employees = Arc::new(InMemoryEmployees::new(employees));
        let attendance = Arc::new(InMemoryAttendance::new(rows));
        let mailer = Arc::new(mailer);
        let state = AppState::new(
            employees.clone(),
            attendance.clone(),
            mailer.clone(),
            config,
        );
        Self {
            router: build_router(state),
            employees,
            attendance,
            mailer,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("call router")
    }

    pub async fn get_json(&self, uri: &str) -> (u16, Value) {
        let response = self.request(Method::GET, uri, None).await;
        let status = response.status().as_u16();
        (status, body_json(response).await)
    }

    pub async fn call(&self, method: Method, uri: &str) -> (u16, Value) {
        let response = self.request(method, uri, None).await;
        let status = response.status().as_u16();
        (status, body_json(response).await)
    }

    pub async fn send_json(&self, method: Method, uri: &str, body: Value) -> (u16, Value) {
        let response = self.request(method, uri, Some(body)).await;
        let status = response.status().as_u16();
        (status, body_json(response).await)
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = body_bytes(response).await;
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("json body")
}
