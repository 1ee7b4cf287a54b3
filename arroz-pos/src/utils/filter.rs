//! List filters for customer, product and order pickers

use shared::models::{Customer, Order, OrderStatus, OrderType, Product};

/// Lowercase and strip Spanish diacritics
pub fn normalize_search(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

fn digits_of(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Customers whose name or phone matches the query
pub fn filter_customers<'a>(customers: &'a [Customer], query: &str) -> Vec<&'a Customer> {
    let needle = normalize_search(query);
    if needle.is_empty() {
        return customers.iter().collect();
    }
    let needle_digits = digits_of(query);

    customers
        .iter()
        .filter(|c| {
            normalize_search(&c.name).contains(&needle)
                || (!needle_digits.is_empty()
                    && c.phone
                        .as_deref()
                        .is_some_and(|p| digits_of(p).contains(&needle_digits)))
        })
        .collect()
}

/// Active products matching the query, optionally within one category
pub fn filter_products<'a>(
    products: &'a [Product],
    query: &str,
    category_id: Option<i64>,
) -> Vec<&'a Product> {
    let needle = normalize_search(query);
    products
        .iter()
        .filter(|p| p.is_active)
        .filter(|p| category_id.is_none_or(|id| p.category_id == id))
        .filter(|p| needle.is_empty() || normalize_search(&p.name).contains(&needle))
        .collect()
}

/// Criteria for the order list
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub order_type: Option<OrderType>,
    /// Matches customer name, guest name or order number (`12` or `#12`)
    pub query: Option<String>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if self.status.is_some_and(|s| s != order.status) {
            return false;
        }
        if self.order_type.is_some_and(|t| t != order.order_type) {
            return false;
        }

        let needle = self
            .query
            .as_deref()
            .map(|q| normalize_search(q.trim_start_matches('#')))
            .unwrap_or_default();
        if needle.is_empty() {
            return true;
        }

        order.id.to_string() == needle
            || [&order.customer_name, &order.guest_name]
                .into_iter()
                .flatten()
                .any(|name| normalize_search(name).contains(&needle))
    }
}

pub fn filter_orders<'a>(orders: &'a [Order], filter: &OrderFilter) -> Vec<&'a Order> {
    orders.iter().filter(|o| filter.matches(o)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: i64, name: &str, phone: Option<&str>) -> Customer {
        Customer {
            id,
            name: name.into(),
            phone: phone.map(Into::into),
            addresses: vec![],
        }
    }

    fn product(id: i64, name: &str, category_id: i64, is_active: bool) -> Product {
        Product {
            id,
            name: name.into(),
            price: 10000.0,
            category_id,
            category_name: None,
            is_active,
        }
    }

    fn order(id: i64, status: OrderStatus, order_type: OrderType, customer: Option<&str>) -> Order {
        let json = serde_json::json!({
            "id": id,
            "type": order_type,
            "status": status,
            "customerName": customer,
            "createdAt": 0,
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_normalize_search() {
        assert_eq!(normalize_search("  Arroz con Piña "), "arroz con pina");
        assert_eq!(normalize_search("JOSÉ Muñoz"), "jose munoz");
    }

    #[test]
    fn test_filter_customers_by_name_or_phone() {
        let list = vec![
            customer(1, "José Pérez", Some("300 123 4567")),
            customer(2, "Ana Gómez", None),
        ];
        let names: Vec<i64> = filter_customers(&list, "perez").iter().map(|c| c.id).collect();
        assert_eq!(names, vec![1]);

        let by_phone: Vec<i64> = filter_customers(&list, "3001234").iter().map(|c| c.id).collect();
        assert_eq!(by_phone, vec![1]);

        assert_eq!(filter_customers(&list, "  ").len(), 2);
    }

    #[test]
    fn test_filter_products() {
        let list = vec![
            product(1, "Arroz chino", 1, true),
            product(2, "Arroz paisa", 2, true),
            product(3, "Arroz viejo", 1, false),
        ];
        let ids: Vec<i64> = filter_products(&list, "arroz", Some(1)).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);

        let ids: Vec<i64> = filter_products(&list, "", None).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_filter_orders() {
        let list = vec![
            order(12, OrderStatus::Taken, OrderType::Onsite, Some("Ana")),
            order(13, OrderStatus::Ready, OrderType::Delivery, Some("Martín")),
            order(14, OrderStatus::Ready, OrderType::Onsite, None),
        ];

        let ready = OrderFilter {
            status: Some(OrderStatus::Ready),
            ..Default::default()
        };
        assert_eq!(filter_orders(&list, &ready).len(), 2);

        let delivery_martin = OrderFilter {
            order_type: Some(OrderType::Delivery),
            query: Some("martin".into()),
            ..Default::default()
        };
        let ids: Vec<i64> = filter_orders(&list, &delivery_martin).iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![13]);

        let by_number = OrderFilter {
            query: Some("#14".into()),
            ..Default::default()
        };
        let ids: Vec<i64> = filter_orders(&list, &by_number).iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![14]);
    }
}
