use rand::Rng;
use std::fmt;
use std::time::Instant;

/// Priority classes, declared in ascending order of precedence.
///
/// The derived ordering is the admission order used by
/// [`generate_priority_ordered`]: `None` sorts first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Priority {
    None,
    Elderly,
    Pregnant,
    InfantInArms,
    Disabled,
}

impl Priority {
    /// The priorities a `PriorityService` customer can be drawn with.
    pub const PREFERENTIAL: [Self; 4] = [
        Self::Elderly,
        Self::Pregnant,
        Self::InfantInArms,
        Self::Disabled,
    ];

    /// Numeric precedence; `None` is 0.
    pub const fn rank(self) -> u8 {
        self as u8
    }

    pub const fn is_preferential(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "NONE",
            Self::Elderly => "ELDERLY",
            Self::Pregnant => "PREGNANT",
            Self::InfantInArms => "INFANT_IN_ARMS",
            Self::Disabled => "DISABLED",
        };
        f.write_str(label)
    }
}

/// What a customer came to the counter for.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ServiceType {
    Withdrawal,
    Payment,
    Deposit,
    PriorityService,
}

impl ServiceType {
    pub const ALL: [Self; 4] = [
        Self::Withdrawal,
        Self::Payment,
        Self::Deposit,
        Self::PriorityService,
    ];
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Withdrawal => "WITHDRAWAL",
            Self::Payment => "PAYMENT",
            Self::Deposit => "DEPOSIT",
            Self::PriorityService => "PRIORITY_SERVICE",
        };
        f.write_str(label)
    }
}

/// A customer waiting to be served.
///
/// Everything but the queue-entry stamp is fixed at construction; the stamp
/// is set once, by the dispatcher, when the customer is admitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Customer {
    id: usize,
    service: ServiceType,
    priority: Priority,
    queued_at: Option<Instant>,
}

impl Customer {
    /// Builds a customer, or `None` if the pair breaks the taxonomy rule:
    /// `PriorityService` customers carry a preferential priority and every
    /// other service type carries `Priority::None`.
    pub fn new(id: usize, service: ServiceType, priority: Priority) -> Option<Self> {
        let is_priority_service = service == ServiceType::PriorityService;
        if is_priority_service != priority.is_preferential() {
            return None;
        }

        Some(Self {
            id,
            service,
            priority,
            queued_at: None,
        })
    }

    /// Draws a customer with a uniformly random service type, and for
    /// `PriorityService` a uniformly random preferential priority.
    pub fn random<R: Rng + ?Sized>(id: usize, rng: &mut R) -> Self {
        let service = ServiceType::ALL[rng.random_range(0..ServiceType::ALL.len())];
        let priority = if service == ServiceType::PriorityService {
            Priority::PREFERENTIAL[rng.random_range(0..Priority::PREFERENTIAL.len())]
        } else {
            Priority::None
        };

        Self {
            id,
            service,
            priority,
            queued_at: None,
        }
    }

    pub const fn id(&self) -> usize {
        self.id
    }

    pub const fn service(&self) -> ServiceType {
        self.service
    }

    pub const fn priority(&self) -> Priority {
        self.priority
    }

    pub const fn queued_at(&self) -> Option<Instant> {
        self.queued_at
    }

    /// Stamps the queue-entry time. Later calls keep the first stamp.
    pub fn mark_queued(&mut self) -> Instant {
        *self.queued_at.get_or_insert_with(Instant::now)
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Customer {}", self.id)
    }
}

/// Generates `n` customers with identifiers `1..=n`, in generation order.
pub fn generate<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Customer> {
    (1..=n).map(|id| Customer::random(id, rng)).collect()
}

/// Generates `n` customers and stably sorts them by ascending priority rank.
///
/// Customers of equal priority keep their generation order.
pub fn generate_priority_ordered<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Customer> {
    let mut customers = generate(n, rng);
    customers.sort_by_key(Customer::priority);
    customers
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn generates_sequential_unique_ids() {
        let mut rng = StdRng::seed_from_u64(7);
        let customers = generate(50, &mut rng);

        assert_eq!(customers.len(), 50);
        let ids: HashSet<usize> = customers.iter().map(Customer::id).collect();
        assert_eq!(ids.len(), 50);
        assert!(customers.iter().map(Customer::id).eq(1..=50));
    }

    #[test]
    fn only_priority_service_carries_a_priority() {
        let mut rng = StdRng::seed_from_u64(11);
        for customer in generate(500, &mut rng) {
            assert_eq!(
                customer.service() == ServiceType::PriorityService,
                customer.priority().is_preferential(),
                "{customer:?}"
            );
        }
    }

    #[test]
    fn priority_ordering_is_non_decreasing_and_stable() {
        let mut rng = StdRng::seed_from_u64(3);
        let customers = generate_priority_ordered(200, &mut rng);

        for pair in customers.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.priority().rank() <= b.priority().rank());
            if a.priority() == b.priority() {
                assert!(a.id() < b.id(), "equal priorities reordered: {a} / {b}");
            }
        }
    }

    #[test]
    fn same_seed_same_customers() {
        let first = generate(20, &mut StdRng::seed_from_u64(42));
        let second = generate(20, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn zero_customers_is_empty() {
        assert!(generate(0, &mut StdRng::seed_from_u64(1)).is_empty());
    }

    #[test]
    fn new_rejects_mismatched_taxonomy() {
        assert!(Customer::new(1, ServiceType::Deposit, Priority::Elderly).is_none());
        assert!(Customer::new(1, ServiceType::PriorityService, Priority::None).is_none());
        assert!(Customer::new(1, ServiceType::PriorityService, Priority::Disabled).is_some());
        assert!(Customer::new(1, ServiceType::Payment, Priority::None).is_some());
    }

    #[test]
    fn queue_stamp_is_set_once() {
        let mut customer = Customer::new(1, ServiceType::Withdrawal, Priority::None).unwrap();
        assert!(customer.queued_at().is_none());
        let first = customer.mark_queued();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert_eq!(customer.mark_queued(), first);
        assert_eq!(customer.queued_at(), Some(first));
    }

    #[test]
    fn rank_follows_declaration_order() {
        assert_eq!(Priority::None.rank(), 0);
        assert_eq!(Priority::Disabled.rank(), 4);
        assert!(Priority::None < Priority::Elderly);
    }
}
