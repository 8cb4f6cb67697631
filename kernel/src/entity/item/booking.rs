use error_stack::Report;
use time::OffsetDateTime;

use crate::entity::{IsBookingAvailable, Item, UpdatedAt, UserId};
use crate::KernelError;

/// Outcome of applying a booking operation to an [`Item`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BookingTransition {
    Unchanged,
    Changed {
        item: Item,
        old_booked_by: Option<UserId>,
        new_booked_by: Option<UserId>,
    },
}

impl Item {
    pub fn book(
        self,
        actor: &UserId,
        at: OffsetDateTime,
    ) -> error_stack::Result<BookingTransition, KernelError> {
        if !*self.is_booking_available.as_ref() {
            return Err(Report::new(KernelError::BookingNotAvailable)
                .attach_printable(format!("item: {:?}", self.id)));
        }
        match &self.booked_by {
            Some(occupant) if occupant == actor => Ok(BookingTransition::Unchanged),
            Some(_) => Err(Report::new(KernelError::ItemAlreadyBooked)
                .attach_printable(format!("item: {:?}", self.id))),
            None => {
                let item = self.reconstruct(|item| {
                    item.booked_by = Some(actor.clone());
                    item.updated_at = UpdatedAt::new(at);
                });
                Ok(BookingTransition::Changed {
                    item,
                    old_booked_by: None,
                    new_booked_by: Some(actor.clone()),
                })
            }
        }
    }

    /// Clears the occupant. Only the occupant or the wish owner may do so.
    pub fn unbook(
        self,
        actor: &UserId,
        owner: &UserId,
        at: OffsetDateTime,
    ) -> error_stack::Result<BookingTransition, KernelError> {
        let Some(occupant) = self.booked_by.clone() else {
            return Ok(BookingTransition::Unchanged);
        };
        if actor != owner && actor != &occupant {
            return Err(Report::new(KernelError::ItemBookedByAnotherUser)
                .attach_printable(format!("item: {:?}", self.id)));
        }
        let item = self.reconstruct(|item| {
            item.booked_by = None;
            item.updated_at = UpdatedAt::new(at);
        });
        Ok(BookingTransition::Changed {
            item,
            old_booked_by: Some(occupant),
            new_booked_by: None,
        })
    }

    /// Disabling booking drops the current occupant.
    pub fn set_booking_availability(
        self,
        available: bool,
        at: OffsetDateTime,
    ) -> BookingTransition {
        if *self.is_booking_available.as_ref() == available {
            return BookingTransition::Unchanged;
        }
        let old_booked_by = self.booked_by.clone();
        let item = self.reconstruct(|item| {
            item.is_booking_available = IsBookingAvailable::new(available);
            if !available {
                item.booked_by = None;
            }
            item.updated_at = UpdatedAt::new(at);
        });
        let new_booked_by = item.booked_by.clone();
        BookingTransition::Changed {
            item,
            old_booked_by,
            new_booked_by,
        }
    }
}

#[cfg(test)]
mod test {
    use time::OffsetDateTime;
    use uuid::Uuid;

    use crate::entity::{
        BookingTransition, CreatedAt, IsBookingAvailable, Item, ItemId, ProductId, UpdatedAt,
        UserId, Version, WishlistId,
    };
    use crate::KernelError;

    fn item(available: bool, booked_by: Option<UserId>) -> Item {
        let now = OffsetDateTime::now_utc();
        Item::new(
            ItemId::new(WishlistId::new(Uuid::new_v4()), ProductId::new(Uuid::new_v4())),
            IsBookingAvailable::new(available),
            booked_by,
            Version::initial(),
            CreatedAt::new(now),
            UpdatedAt::new(now),
        )
    }

    fn user() -> UserId {
        UserId::new(Uuid::new_v4())
    }

    #[test]
    fn book_free_item() -> error_stack::Result<(), KernelError> {
        let actor = user();
        let transition = item(true, None).book(&actor, OffsetDateTime::now_utc())?;
        let BookingTransition::Changed {
            item,
            old_booked_by,
            new_booked_by,
        } = transition
        else {
            panic!("expected a change");
        };
        assert_eq!(item.booked_by(), &Some(actor.clone()));
        assert_eq!(old_booked_by, None);
        assert_eq!(new_booked_by, Some(actor));
        Ok(())
    }

    #[test]
    fn rebook_by_occupant_is_noop() -> error_stack::Result<(), KernelError> {
        let actor = user();
        let transition = item(true, Some(actor.clone())).book(&actor, OffsetDateTime::now_utc())?;
        assert_eq!(transition, BookingTransition::Unchanged);
        Ok(())
    }

    #[test]
    fn book_occupied_item_fails() {
        let result = item(true, Some(user())).book(&user(), OffsetDateTime::now_utc());
        let report = result.expect_err("occupied item must reject");
        assert!(matches!(
            report.current_context(),
            KernelError::ItemAlreadyBooked
        ));
    }

    #[test]
    fn book_unavailable_item_fails() {
        let result = item(false, None).book(&user(), OffsetDateTime::now_utc());
        let report = result.expect_err("unavailable item must reject");
        assert!(matches!(
            report.current_context(),
            KernelError::BookingNotAvailable
        ));
    }

    #[test]
    fn unavailable_item_never_holds_occupant() {
        let item = item(false, Some(user()));
        assert_eq!(item.booked_by(), &None);
    }

    #[test]
    fn unbook_rules() -> error_stack::Result<(), KernelError> {
        let owner = user();
        let occupant = user();
        let now = OffsetDateTime::now_utc();

        let by_owner = item(true, Some(occupant.clone())).unbook(&owner, &owner, now)?;
        assert!(matches!(by_owner, BookingTransition::Changed { .. }));

        let by_occupant = item(true, Some(occupant.clone())).unbook(&occupant, &owner, now)?;
        let BookingTransition::Changed {
            old_booked_by,
            new_booked_by,
            ..
        } = by_occupant
        else {
            panic!("expected a change");
        };
        assert_eq!(old_booked_by, Some(occupant.clone()));
        assert_eq!(new_booked_by, None);

        let report = item(true, Some(occupant))
            .unbook(&user(), &owner, now)
            .expect_err("stranger must not unbook");
        assert!(matches!(
            report.current_context(),
            KernelError::ItemBookedByAnotherUser
        ));

        let empty = item(true, None).unbook(&user(), &owner, now)?;
        assert_eq!(empty, BookingTransition::Unchanged);
        Ok(())
    }

    #[test]
    fn disabling_booking_clears_occupant() {
        let occupant = user();
        let transition =
            item(true, Some(occupant.clone())).set_booking_availability(false, OffsetDateTime::now_utc());
        let BookingTransition::Changed {
            item,
            old_booked_by,
            new_booked_by,
        } = transition
        else {
            panic!("expected a change");
        };
        assert_eq!(item.is_booking_available(), &IsBookingAvailable::new(false));
        assert_eq!(item.booked_by(), &None);
        assert_eq!(old_booked_by, Some(occupant));
        assert_eq!(new_booked_by, None);

        let same = item.set_booking_availability(false, OffsetDateTime::now_utc());
        assert_eq!(same, BookingTransition::Unchanged);
    }
}
