// libs/shared/store/src/memory.rs
//
// In-memory reference implementation of the store contracts. Every trait
// method takes one lock, so the check-then-insert gap the read-side
// services cannot close (two concurrent bookings for the same interval) is
// closed here: `create` and `update` re-check the scheduled-overlap
// exclusion constraint under the lock and fail with `StoreError::Conflict`.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use shared_models::{
    Appointment, AppointmentStatus, Business, BusinessService, Employee, ScheduleOverride,
    ScheduleTemplate, User,
};
use shared_utils::time::spans_overlap;

use crate::traits::{
    AppointmentStore, BusinessStore, EmployeeStore, ScheduleStore, ServiceStore, StoreError,
    Stores, UserStore,
};

#[derive(Default)]
struct Inner {
    next_id: i32,
    businesses: HashMap<i32, Business>,
    users: HashMap<i32, User>,
    employees: HashMap<i32, Employee>,
    services: HashMap<i32, BusinessService>,
    assignments: HashSet<(i32, i32)>,
    templates: HashMap<i32, ScheduleTemplate>,
    overrides: HashMap<i32, ScheduleOverride>,
    appointments: HashMap<i32, Appointment>,
}

impl Inner {
    fn alloc(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn scheduled_overlap_exists(&self, candidate: &Appointment) -> bool {
        self.appointments.values().any(|existing| {
            existing.id != candidate.id
                && existing.employee_id == candidate.employee_id
                && existing.status == AppointmentStatus::Scheduled
                && spans_overlap(
                    candidate.start_time,
                    candidate.end_time,
                    existing.start_time,
                    existing.end_time,
                )
        })
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// All six collaborator handles backed by this store.
    pub fn stores(self: &Arc<Self>) -> Stores {
        Stores {
            business: self.clone(),
            user: self.clone(),
            employee: self.clone(),
            service: self.clone(),
            schedule: self.clone(),
            appointment: self.clone(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    // Seeding helpers for tests and local tooling.

    pub fn add_business(&self, mut business: Business) -> Business {
        let mut inner = self.inner.lock().unwrap();
        business.id = inner.alloc();
        inner.businesses.insert(business.id, business.clone());
        business
    }

    pub fn add_user(&self, mut user: User) -> User {
        let mut inner = self.inner.lock().unwrap();
        user.id = inner.alloc();
        inner.users.insert(user.id, user.clone());
        user
    }

    pub fn add_employee(&self, mut employee: Employee) -> Employee {
        let mut inner = self.inner.lock().unwrap();
        employee.id = inner.alloc();
        inner.employees.insert(employee.id, employee.clone());
        employee
    }

    pub fn add_service(&self, mut service: BusinessService) -> BusinessService {
        let mut inner = self.inner.lock().unwrap();
        service.id = inner.alloc();
        inner.services.insert(service.id, service.clone());
        service
    }

    pub fn assign_service(&self, employee_id: i32, service_id: i32) {
        let mut inner = self.inner.lock().unwrap();
        inner.assignments.insert((employee_id, service_id));
    }
}

#[async_trait]
impl BusinessStore for MemoryStore {
    async fn get(&self, id: i32) -> Result<Business, StoreError> {
        self.lock()?
            .businesses
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get(&self, id: i32) -> Result<User, StoreError> {
        self.lock()?
            .users
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn get(&self, id: i32) -> Result<Employee, StoreError> {
        self.lock()?
            .employees
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn assigned_services(
        &self,
        employee_id: i32,
    ) -> Result<Vec<BusinessService>, StoreError> {
        let inner = self.lock()?;
        let mut services: Vec<BusinessService> = inner
            .assignments
            .iter()
            .filter(|(employee, _)| *employee == employee_id)
            .filter_map(|(_, service)| inner.services.get(service).cloned())
            .collect();
        services.sort_by_key(|service| service.id);
        Ok(services)
    }
}

#[async_trait]
impl ServiceStore for MemoryStore {
    async fn get(&self, id: i32) -> Result<BusinessService, StoreError> {
        self.lock()?
            .services
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn create_template(
        &self,
        mut template: ScheduleTemplate,
    ) -> Result<ScheduleTemplate, StoreError> {
        let mut inner = self.lock()?;
        template.id = inner.alloc();
        inner.templates.insert(template.id, template.clone());
        Ok(template)
    }

    async fn update_template(
        &self,
        template: ScheduleTemplate,
    ) -> Result<ScheduleTemplate, StoreError> {
        let mut inner = self.lock()?;
        if !inner.templates.contains_key(&template.id) {
            return Err(StoreError::NotFound);
        }
        inner.templates.insert(template.id, template.clone());
        Ok(template)
    }

    async fn delete_template(&self, id: i32) -> Result<(), StoreError> {
        self.lock()?
            .templates
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn get_template(&self, id: i32) -> Result<ScheduleTemplate, StoreError> {
        self.lock()?
            .templates
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_templates(&self, employee_id: i32) -> Result<Vec<ScheduleTemplate>, StoreError> {
        let inner = self.lock()?;
        let mut templates: Vec<ScheduleTemplate> = inner
            .templates
            .values()
            .filter(|template| template.employee_id == employee_id)
            .cloned()
            .collect();
        templates.sort_by_key(|template| (template.day_of_week, template.start_time));
        Ok(templates)
    }

    async fn template_for_weekday(
        &self,
        employee_id: i32,
        day_of_week: i32,
    ) -> Result<Option<ScheduleTemplate>, StoreError> {
        let inner = self.lock()?;
        let mut candidates: Vec<&ScheduleTemplate> = inner
            .templates
            .values()
            .filter(|template| {
                template.employee_id == employee_id && template.day_of_week == day_of_week
            })
            .collect();
        candidates.sort_by_key(|template| (template.is_break, template.start_time));
        Ok(candidates.first().map(|template| (*template).clone()))
    }

    async fn create_override(
        &self,
        mut schedule_override: ScheduleOverride,
    ) -> Result<ScheduleOverride, StoreError> {
        let mut inner = self.lock()?;
        let duplicate = inner.overrides.values().any(|existing| {
            existing.employee_id == schedule_override.employee_id
                && existing.override_date == schedule_override.override_date
        });
        if duplicate {
            return Err(StoreError::Conflict(
                "override already exists for this date".to_string(),
            ));
        }
        schedule_override.id = inner.alloc();
        inner
            .overrides
            .insert(schedule_override.id, schedule_override.clone());
        Ok(schedule_override)
    }

    async fn update_override(
        &self,
        schedule_override: ScheduleOverride,
    ) -> Result<ScheduleOverride, StoreError> {
        let mut inner = self.lock()?;
        if !inner.overrides.contains_key(&schedule_override.id) {
            return Err(StoreError::NotFound);
        }
        inner
            .overrides
            .insert(schedule_override.id, schedule_override.clone());
        Ok(schedule_override)
    }

    async fn delete_override(&self, id: i32) -> Result<(), StoreError> {
        self.lock()?
            .overrides
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn get_override(&self, id: i32) -> Result<ScheduleOverride, StoreError> {
        self.lock()?
            .overrides
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn override_for_date(
        &self,
        employee_id: i32,
        date: NaiveDate,
    ) -> Result<Option<ScheduleOverride>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .overrides
            .values()
            .find(|existing| {
                existing.employee_id == employee_id && existing.override_date == date
            })
            .cloned())
    }

    async fn list_overrides(
        &self,
        employee_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ScheduleOverride>, StoreError> {
        let inner = self.lock()?;
        let mut overrides: Vec<ScheduleOverride> = inner
            .overrides
            .values()
            .filter(|existing| {
                existing.employee_id == employee_id
                    && existing.override_date >= from
                    && existing.override_date <= to
            })
            .cloned()
            .collect();
        overrides.sort_by_key(|existing| existing.override_date);
        Ok(overrides)
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn create(&self, mut appointment: Appointment) -> Result<Appointment, StoreError> {
        let mut inner = self.lock()?;
        if appointment.status == AppointmentStatus::Scheduled
            && inner.scheduled_overlap_exists(&appointment)
        {
            return Err(StoreError::Conflict(
                "employee already has a scheduled appointment in this interval".to_string(),
            ));
        }
        appointment.id = inner.alloc();
        inner.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn get(&self, id: i32) -> Result<Appointment, StoreError> {
        self.lock()?
            .appointments
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        let mut inner = self.lock()?;
        if !inner.appointments.contains_key(&appointment.id) {
            return Err(StoreError::NotFound);
        }
        if appointment.status == AppointmentStatus::Scheduled
            && inner.scheduled_overlap_exists(&appointment)
        {
            return Err(StoreError::Conflict(
                "employee already has a scheduled appointment in this interval".to_string(),
            ));
        }
        inner.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn set_status(
        &self,
        id: i32,
        status: AppointmentStatus,
    ) -> Result<Appointment, StoreError> {
        let mut inner = self.lock()?;
        let appointment = inner.appointments.get_mut(&id).ok_or(StoreError::NotFound)?;
        appointment.status = status;
        Ok(appointment.clone())
    }

    async fn list_by_employee(
        &self,
        employee_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError> {
        self.list_where(|appointment| appointment.employee_id == employee_id, from, to)
    }

    async fn list_by_business(
        &self,
        business_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError> {
        self.list_where(|appointment| appointment.business_id == business_id, from, to)
    }

    async fn list_by_client(
        &self,
        client_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError> {
        self.list_where(|appointment| appointment.client_id == client_id, from, to)
    }
}

impl MemoryStore {
    fn list_where(
        &self,
        matches: impl Fn(&Appointment) -> bool,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError> {
        let inner = self.lock()?;
        let mut appointments: Vec<Appointment> = inner
            .appointments
            .values()
            .filter(|appointment| {
                matches(appointment)
                    && spans_overlap(appointment.start_time, appointment.end_time, from, to)
            })
            .cloned()
            .collect();
        appointments.sort_by_key(|appointment| appointment.start_time);
        Ok(appointments)
    }
}
