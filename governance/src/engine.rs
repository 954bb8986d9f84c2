//! Governance engine: proposal lifecycle, voting and parameter governance.
//!
//! The engine owns its state and borrows nothing mutable from its
//! collaborators. Every mutating operation validates fully before touching
//! state, so a returned error always leaves the engine unchanged.

use vota_types::{Address, Checkpoint, CredentialId, LevelMultipliers, NodeLevel, ProposalId};

use crate::auth::{Authorizer, Role};
use crate::choice::ChoiceMask;
use crate::clock::SnapshotClock;
use crate::config::GovernanceConfig;
use crate::error::GovernanceError;
use crate::event::{EventBus, GovernanceEvent};
use crate::ledger::CredentialLedger;
use crate::params::{GovernanceParams, ParameterChange};
use crate::power::{VotingPower, VotingPowerResolver};
use crate::proposal::{NewProposal, Proposal, ProposalState};
use crate::quorum::QuorumEngine;
use crate::state::GovernanceState;
use crate::tally::Vote;

const SETTINGS_ROLES: &[Role] = &[Role::Admin, Role::SettingsManager];
const PROPOSER_ROLES: &[Role] = &[Role::Admin, Role::Proposer];
const EXECUTOR_ROLES: &[Role] = &[Role::Admin, Role::Executor];

pub struct GovernanceEngine<L, C, A> {
    state: GovernanceState,
    ledger: L,
    clock: C,
    authorizer: A,
    events: EventBus,
}

impl<L, C, A> GovernanceEngine<L, C, A>
where
    L: CredentialLedger,
    C: SnapshotClock,
    A: Authorizer,
{
    /// Create an engine whose initial parameters take effect at the clock's
    /// current checkpoint.
    pub fn new(
        config: &GovernanceConfig,
        ledger: L,
        clock: C,
        authorizer: A,
    ) -> Result<Self, GovernanceError> {
        let genesis = clock.current();
        let params = GovernanceParams::new(config.initial_params(), genesis)?;
        tracing::info!(
            checkpoint = genesis.as_u64(),
            quorum_numerator = config.quorum_numerator,
            min_staked_amount = config.min_staked_amount,
            "governance engine initialized"
        );
        Ok(Self {
            state: GovernanceState::new(params, config.validator_weight.into()),
            ledger,
            clock,
            authorizer,
            events: EventBus::new(),
        })
    }

    /// Rebuild an engine from bytes produced by [`save_state`](Self::save_state).
    pub fn restore(
        data: &[u8],
        ledger: L,
        clock: C,
        authorizer: A,
    ) -> Result<Self, GovernanceError> {
        let state = GovernanceState::decode(data)?;
        tracing::info!(proposals = state.proposal_count(), "governance state restored");
        Ok(Self {
            state,
            ledger,
            clock,
            authorizer,
            events: EventBus::new(),
        })
    }

    pub fn save_state(&self) -> Result<Vec<u8>, GovernanceError> {
        self.state.encode()
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn authorizer(&self) -> &A {
        &self.authorizer
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.state.params
    }

    pub fn validator_weight(&self) -> u128 {
        self.state.validator_weight
    }

    // ── Proposals ────────────────────────────────────────────────────────

    /// Register a new proposal and return its content-derived id.
    pub fn propose(
        &mut self,
        proposer: &Address,
        request: NewProposal,
    ) -> Result<ProposalId, GovernanceError> {
        if proposer.is_zero() {
            return Err(GovernanceError::InvalidAddress("zero proposer".into()));
        }
        self.require_any(PROPOSER_ROLES, proposer)?;

        let now = self.clock.current();
        let params = &self.state.params;

        let delay = params.min_voting_delay(now)?.max(1);
        let earliest = now.after(delay);
        if request.snapshot < earliest {
            return Err(GovernanceError::InvalidStartCheckpoint {
                snapshot: request.snapshot,
                earliest,
            });
        }

        let min = params.min_voting_duration(now)?;
        let max = params.max_voting_duration(now)?;
        if request.duration < min || request.duration > max {
            return Err(GovernanceError::InvalidDuration {
                duration: request.duration,
                min,
                max,
            });
        }

        let max_choices = params.max_choices(now)? as usize;
        let count = request.choices.len();
        if count == 0 || count > max_choices || request.max_selection as usize > count {
            return Err(GovernanceError::InvalidChoiceCount {
                count,
                max: max_choices,
            });
        }
        if request.min_selection == 0 || request.min_selection > request.max_selection {
            return Err(GovernanceError::InvalidSelectionRange {
                min: request.min_selection,
                max: request.max_selection,
            });
        }

        if request.description_ref.is_empty() {
            return Err(GovernanceError::InvalidProposalDescription);
        }

        let id = request.id(proposer);
        if self.state.proposals.contains_key(&id) {
            return Err(GovernanceError::DuplicateProposal(id));
        }

        let proposal = Proposal::from_request(id, *proposer, request, now);
        let event = GovernanceEvent::ProposalCreated {
            id,
            proposer: *proposer,
            snapshot: proposal.snapshot,
            deadline: proposal.deadline,
            choice_count: proposal.choices.len(),
            description_ref: proposal.description_ref.clone(),
        };
        tracing::info!(
            %id,
            %proposer,
            snapshot = proposal.snapshot.as_u64(),
            deadline = proposal.deadline.as_u64(),
            choices = proposal.choices.len(),
            "proposal created"
        );

        self.state.tally.open(id, proposal.choices.len());
        self.state.proposals.insert(id, proposal);
        self.state.proposal_order.push(id);
        self.events.emit(&event);
        Ok(id)
    }

    /// Cancel a proposal. The proposer may cancel only while it is pending;
    /// an admin may also cancel while voting is open.
    pub fn cancel(
        &mut self,
        actor: &Address,
        id: &ProposalId,
        reason: Option<String>,
    ) -> Result<(), GovernanceError> {
        let proposal = self.proposal(id)?;
        let is_proposer = proposal.proposer == *actor;
        let is_admin = self.authorizer.has_role(Role::Admin, actor);
        if !is_proposer && !is_admin {
            tracing::warn!(%actor, %id, "unauthorized cancel");
            return Err(GovernanceError::Unauthorized(*actor));
        }

        let state = self.state_of(proposal)?;
        let allowed = match state {
            ProposalState::Pending => true,
            ProposalState::Active => is_admin,
            _ => false,
        };
        if !allowed {
            return Err(GovernanceError::UnexpectedState { id: *id, state });
        }

        if let Some(proposal) = self.state.proposals.get_mut(id) {
            proposal.canceled = true;
            proposal.cancel_reason = reason.clone();
        }
        tracing::info!(%id, %actor, from = %state, "proposal canceled");
        self.events.emit(&GovernanceEvent::ProposalCanceled {
            id: *id,
            by: *actor,
            reason,
        });
        Ok(())
    }

    /// Mark a succeeded proposal as executed.
    pub fn execute(
        &mut self,
        actor: &Address,
        id: &ProposalId,
        comment: Option<String>,
    ) -> Result<(), GovernanceError> {
        let proposal = self.proposal(id)?;
        self.require_any(EXECUTOR_ROLES, actor)?;

        let state = self.state_of(proposal)?;
        if state != ProposalState::Succeeded {
            return Err(GovernanceError::UnexpectedState { id: *id, state });
        }

        if let Some(proposal) = self.state.proposals.get_mut(id) {
            proposal.executed = true;
            proposal.execution_comment = comment.clone();
        }
        tracing::info!(%id, %actor, "proposal executed");
        self.events.emit(&GovernanceEvent::ProposalExecuted {
            id: *id,
            by: *actor,
            comment,
        });
        Ok(())
    }

    /// Lifecycle state of `id` at the current checkpoint.
    pub fn state(&self, id: &ProposalId) -> Result<ProposalState, GovernanceError> {
        self.state_of(self.proposal(id)?)
    }

    pub fn proposal(&self, id: &ProposalId) -> Result<&Proposal, GovernanceError> {
        self.state
            .proposals
            .get(id)
            .ok_or(GovernanceError::NonexistentProposal(*id))
    }

    /// Every proposal id in creation order.
    pub fn proposal_ids(&self) -> &[ProposalId] {
        &self.state.proposal_order
    }

    pub fn proposal_snapshot(&self, id: &ProposalId) -> Result<Checkpoint, GovernanceError> {
        Ok(self.proposal(id)?.snapshot)
    }

    pub fn proposal_deadline(&self, id: &ProposalId) -> Result<Checkpoint, GovernanceError> {
        Ok(self.proposal(id)?.deadline)
    }

    pub fn proposal_proposer(&self, id: &ProposalId) -> Result<Address, GovernanceError> {
        Ok(self.proposal(id)?.proposer)
    }

    // ── Voting ───────────────────────────────────────────────────────────

    pub fn cast_vote(
        &mut self,
        voter: &Address,
        id: &ProposalId,
        choices: ChoiceMask,
        validator: Option<&Address>,
    ) -> Result<u128, GovernanceError> {
        self.record_vote(voter, id, choices, None, validator)
    }

    pub fn cast_vote_with_reason(
        &mut self,
        voter: &Address,
        id: &ProposalId,
        choices: ChoiceMask,
        reason: String,
        validator: Option<&Address>,
    ) -> Result<u128, GovernanceError> {
        self.record_vote(voter, id, choices, Some(reason), validator)
    }

    fn record_vote(
        &mut self,
        voter: &Address,
        id: &ProposalId,
        choices: ChoiceMask,
        reason: Option<String>,
        validator: Option<&Address>,
    ) -> Result<u128, GovernanceError> {
        if voter.is_zero() {
            return Err(GovernanceError::InvalidAddress("zero voter".into()));
        }
        let proposal = self.proposal(id)?;

        let state = self.state_of(proposal)?;
        if state != ProposalState::Active {
            return Err(GovernanceError::ProposalNotActive { id: *id, state });
        }

        let tally = self
            .state
            .tally
            .get(id)
            .ok_or(GovernanceError::NonexistentProposal(*id))?;
        if tally.has_voted(voter) {
            return Err(GovernanceError::AlreadyVoted(*voter));
        }

        if !choices.is_valid_for(
            proposal.choices.len(),
            proposal.min_selection,
            proposal.max_selection,
        ) {
            return Err(GovernanceError::InvalidVoteChoice { mask: choices.bits() });
        }

        let power = self.resolver().weight(voter, proposal.snapshot, validator)?;
        if power.is_zero() {
            return Err(GovernanceError::VoterNotEligible(*voter));
        }
        // Any named validator is claimed by this ballot, endorsed or not.
        let endorsee = validator.filter(|v| !v.is_zero()).copied();
        if let Some(validator) = &endorsee {
            if tally.validator_used(validator) {
                tracing::warn!(%voter, %id, %validator, "validator already backed a ballot");
                return Err(GovernanceError::VoterNotEligible(*voter));
            }
        }
        if let Some(credential) = tally.first_consumed(&power.used_credentials) {
            tracing::warn!(%voter, %id, %credential, "credential already consumed");
            return Err(GovernanceError::VoterNotEligible(*voter));
        }

        let VotingPower {
            weight,
            used_credentials,
            ..
        } = power;
        let vote = Vote {
            choices,
            weight,
            reason: reason.clone(),
            used_credentials,
            validator_endorsee: endorsee,
            cast_at: self.clock.current(),
        };
        if let Some(tally) = self.state.tally.get_mut(id) {
            tally.record(*voter, vote);
        }

        tracing::info!(%id, %voter, ?choices, weight = %weight, "vote cast");
        self.events.emit(&GovernanceEvent::VoteCast {
            id: *id,
            voter: *voter,
            choices,
            weight,
            reason,
        });
        Ok(weight)
    }

    pub fn has_voted(&self, id: &ProposalId, voter: &Address) -> bool {
        self.state.tally.has_voted(id, voter)
    }

    pub fn get_vote(&self, id: &ProposalId, voter: &Address) -> Option<&Vote> {
        self.state.tally.get(id).and_then(|tally| tally.vote(voter))
    }

    /// Total weight cast on `id`.
    pub fn total_votes(&self, id: &ProposalId) -> Result<u128, GovernanceError> {
        self.proposal(id)?;
        Ok(self.state.tally.total_weight(id))
    }

    /// Weight accumulated per choice index.
    pub fn choice_weights(&self, id: &ProposalId) -> Result<&[u128], GovernanceError> {
        self.state
            .tally
            .get(id)
            .map(|tally| tally.choice_weights())
            .ok_or(GovernanceError::NonexistentProposal(*id))
    }

    /// `participant`'s weight at the current checkpoint.
    pub fn get_vote_weight(
        &self,
        participant: &Address,
        validator: Option<&Address>,
    ) -> Result<u128, GovernanceError> {
        self.get_vote_weight_at(participant, self.clock.current(), validator)
    }

    pub fn get_vote_weight_at(
        &self,
        participant: &Address,
        at: Checkpoint,
        validator: Option<&Address>,
    ) -> Result<u128, GovernanceError> {
        Ok(self.resolver().weight(participant, at, validator)?.weight)
    }

    /// Level of a credential as the ledger currently reports it.
    pub fn credential_level(&self, id: CredentialId) -> Result<NodeLevel, GovernanceError> {
        self.ledger
            .credential(id, self.clock.current())
            .map(|c| c.level)
            .ok_or(GovernanceError::InvalidCredentialId(id))
    }

    // ── Quorum ───────────────────────────────────────────────────────────

    pub fn quorum(&self, at: Checkpoint) -> Result<u128, GovernanceError> {
        self.quorum_engine().quorum(at)
    }

    pub fn quorum_numerator(&self, at: Checkpoint) -> Result<u32, GovernanceError> {
        self.quorum_engine().quorum_numerator(at)
    }

    pub fn min_staked_amount(&self, at: Checkpoint) -> Result<u128, GovernanceError> {
        self.quorum_engine().min_stake(at)
    }

    pub fn total_weight(&self, at: Checkpoint) -> Result<u128, GovernanceError> {
        self.quorum_engine().total_weight(at)
    }

    /// Whether the weight cast on `id` meets the quorum in effect at its deadline.
    pub fn is_quorum_reached(&self, id: &ProposalId) -> Result<bool, GovernanceError> {
        self.quorum_reached_for(self.proposal(id)?)
    }

    // ── Parameter governance ─────────────────────────────────────────────

    pub fn update_quorum_numerator(
        &mut self,
        actor: &Address,
        value: u32,
    ) -> Result<ParameterChange, GovernanceError> {
        self.require_any(SETTINGS_ROLES, actor)?;
        let at = self.clock.current();
        let change = self.state.params.set_quorum_numerator(value, at)?;
        Ok(self.announce(change))
    }

    pub fn set_min_staked_amount(
        &mut self,
        actor: &Address,
        value: u128,
    ) -> Result<ParameterChange, GovernanceError> {
        self.require_any(SETTINGS_ROLES, actor)?;
        let at = self.clock.current();
        let change = self.state.params.set_min_staked_amount(value, at)?;
        Ok(self.announce(change))
    }

    pub fn set_min_voting_delay(
        &mut self,
        actor: &Address,
        value: u64,
    ) -> Result<ParameterChange, GovernanceError> {
        self.require_any(SETTINGS_ROLES, actor)?;
        let at = self.clock.current();
        let change = self.state.params.set_min_voting_delay(value, at)?;
        Ok(self.announce(change))
    }

    pub fn set_min_voting_duration(
        &mut self,
        actor: &Address,
        value: u64,
    ) -> Result<ParameterChange, GovernanceError> {
        self.require_any(SETTINGS_ROLES, actor)?;
        let at = self.clock.current();
        let change = self.state.params.set_min_voting_duration(value, at)?;
        Ok(self.announce(change))
    }

    pub fn set_max_voting_duration(
        &mut self,
        actor: &Address,
        value: u64,
    ) -> Result<ParameterChange, GovernanceError> {
        self.require_any(SETTINGS_ROLES, actor)?;
        let at = self.clock.current();
        let change = self.state.params.set_max_voting_duration(value, at)?;
        Ok(self.announce(change))
    }

    pub fn set_max_choices(
        &mut self,
        actor: &Address,
        value: u8,
    ) -> Result<ParameterChange, GovernanceError> {
        self.require_any(SETTINGS_ROLES, actor)?;
        let at = self.clock.current();
        let change = self.state.params.set_max_choices(value, at)?;
        Ok(self.announce(change))
    }

    /// Replace the level multiplier table from the current checkpoint onward.
    pub fn update_level_multipliers(
        &mut self,
        actor: &Address,
        table: LevelMultipliers,
    ) -> Result<(), GovernanceError> {
        self.require_any(SETTINGS_ROLES, actor)?;
        let at = self.clock.current();
        let old = self.state.params.set_level_multipliers(table.clone(), at)?;
        tracing::info!(checkpoint = at.as_u64(), "level multipliers updated");
        self.events.emit(&GovernanceEvent::LevelMultipliersUpdated {
            old,
            new: table,
            effective_from: at,
        });
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn require_any(&self, roles: &[Role], actor: &Address) -> Result<(), GovernanceError> {
        if self.authorizer.has_any_role(roles, actor) {
            return Ok(());
        }
        tracing::warn!(%actor, required = ?roles, "unauthorized");
        Err(GovernanceError::Unauthorized(*actor))
    }

    fn announce(&self, change: ParameterChange) -> ParameterChange {
        tracing::info!(
            param = change.param.name(),
            old = ?change.old,
            new = %change.new,
            effective_from = change.effective_from.as_u64(),
            "parameter changed"
        );
        self.events.emit(&GovernanceEvent::ParameterChanged(change.clone()));
        change
    }

    fn resolver(&self) -> VotingPowerResolver<'_, L> {
        VotingPowerResolver::new(&self.ledger, &self.state.params, self.state.validator_weight)
    }

    fn quorum_engine(&self) -> QuorumEngine<'_, L> {
        QuorumEngine::new(&self.ledger, &self.state.params)
    }

    fn quorum_reached_for(&self, proposal: &Proposal) -> Result<bool, GovernanceError> {
        let tallied = self.state.tally.total_weight(&proposal.id);
        self.quorum_engine().is_reached(tallied, proposal.deadline)
    }

    fn state_of(&self, proposal: &Proposal) -> Result<ProposalState, GovernanceError> {
        proposal.state_at(self.clock.current(), || self.quorum_reached_for(proposal))
    }
}
