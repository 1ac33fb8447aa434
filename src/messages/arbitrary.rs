use proptest::{
    arbitrary::{any, Arbitrary},
    array, collection,
    prelude::*,
};

use super::*;

fn payload() -> impl Strategy<Value = Vec<u8>> {
    collection::vec(any::<u8>(), 1..64)
}

impl Arbitrary for NodeId {
    type Parameters = ();

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        any::<u64>().prop_map(NodeId).boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}

impl Arbitrary for RosterHash {
    type Parameters = ();

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        array::uniform32(any::<u8>()).prop_map(RosterHash).boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}

impl Arbitrary for TransactionId {
    type Parameters = ();

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (any::<NodeId>(), any::<u64>())
            .prop_map(|(submitter, sequence)| TransactionId {
                submitter,
                sequence,
            })
            .boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}

impl Arbitrary for TssMessageTransaction {
    type Parameters = ();

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (
            any::<TransactionId>(),
            any::<RosterHash>(),
            any::<RosterHash>(),
            constants::MIN_SHARE_INDEX..=u32::MAX,
            payload(),
        )
            .prop_map(
                |(transaction_id, source_roster_hash, target_roster_hash, share_index, tss_message)| {
                    TssMessageTransaction {
                        transaction_id,
                        source_roster_hash,
                        target_roster_hash,
                        share_index,
                        tss_message,
                    }
                },
            )
            .boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}

impl Arbitrary for TssVoteTransaction {
    type Parameters = ();

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (
            any::<TransactionId>(),
            any::<RosterHash>(),
            any::<RosterHash>(),
            payload(),
            payload(),
            payload(),
        )
            .prop_map(
                |(
                    transaction_id,
                    source_roster_hash,
                    target_roster_hash,
                    ledger_id,
                    node_signature,
                    tss_vote,
                )| TssVoteTransaction {
                    transaction_id,
                    voter: transaction_id.submitter,
                    source_roster_hash,
                    target_roster_hash,
                    ledger_id,
                    node_signature,
                    tss_vote,
                },
            )
            .boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}

impl Arbitrary for TssShareSignatureTransaction {
    type Parameters = ();

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (
            any::<TransactionId>(),
            any::<RosterHash>(),
            constants::MIN_SHARE_INDEX..=u32::MAX,
            payload(),
            payload(),
        )
            .prop_map(
                |(transaction_id, roster_hash, share_index, message_hash, share_signature)| {
                    TssShareSignatureTransaction {
                        transaction_id,
                        roster_hash,
                        share_index,
                        message_hash,
                        share_signature,
                    }
                },
            )
            .boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}
